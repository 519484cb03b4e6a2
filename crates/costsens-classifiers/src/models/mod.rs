pub mod classifier_trait;
pub mod factory;
pub mod logistic;
pub mod utils;

pub use classifier_trait::ClassifierModel;
pub use logistic::LogisticRegression;
