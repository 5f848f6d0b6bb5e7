pub mod declaration;
pub mod preparation;
pub mod scoring;
pub mod turn;
