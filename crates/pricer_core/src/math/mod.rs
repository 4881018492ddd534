//! Numerical building blocks for Monte Carlo estimators.
//!
//! - [`regression`]: Least-squares polynomial regression via Cholesky-solved normal equations
//! - [`statistics`]: Sample mean, standard deviation and standard error

pub mod regression;
pub mod statistics;
