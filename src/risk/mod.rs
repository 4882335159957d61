pub mod score;
pub mod var;

pub use score::{RiskAssessment, RiskInputs, RiskLevel, RiskScorer};
pub use var::{expected_shortfall, value_at_risk};
