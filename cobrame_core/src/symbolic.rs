//! Coupling coefficients which are algebraic functions of the growth rate (μ)
//!
//! Coefficients are stored as a small expression tree over the single symbol μ.
//! Constant sub-expressions are folded while the tree is being built, so a
//! coefficient which doesn't depend on μ is always a plain [`Expression::Constant`].
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::me_model::MeModelError;

/// Seconds per hour, keff values are per second while μ is per hour
pub const SECONDS_PER_HOUR: f64 = 3600.;

/// An expression in the growth rate μ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A numeric constant
    Constant(f64),
    /// The growth rate symbol
    Mu,
    /// Sum of two expressions
    Sum(Box<Expression>, Box<Expression>),
    /// Product of two expressions
    Product(Box<Expression>, Box<Expression>),
    /// Quotient of two expressions, the denominator is never a zero constant
    Quotient(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Create a constant expression
    pub fn constant(value: f64) -> Self {
        Expression::Constant(value)
    }

    /// The constant 0
    pub fn zero() -> Self {
        Expression::Constant(0.)
    }

    /// The growth rate symbol μ
    pub fn mu() -> Self {
        Expression::Mu
    }

    /// Dilution of an enzyme catalyzing a process at `keff` (per second):
    /// μ / (keff * 3600)
    ///
    /// # Examples
    /// ```rust
    /// use cobrame_core::symbolic::Expression;
    /// let dilution = Expression::dilution(65.).unwrap();
    /// assert!((dilution.substitute(1.) - 1. / (65. * 3600.)).abs() < 1e-12);
    /// assert!(Expression::dilution(0.).is_err());
    /// ```
    pub fn dilution(keff: f64) -> Result<Self, MeModelError> {
        validate_keff(keff)?;
        Expression::mu().div_const(keff * SECONDS_PER_HOUR)
    }

    /// Is this expression free of μ
    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// Returns the value if the expression is a folded constant
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Expression::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Does the expression reference μ anywhere
    pub fn depends_on_mu(&self) -> bool {
        match self {
            Expression::Constant(_) => false,
            Expression::Mu => true,
            Expression::Sum(l, r) | Expression::Product(l, r) | Expression::Quotient(l, r) => {
                l.depends_on_mu() || r.depends_on_mu()
            }
        }
    }

    /// Is this the folded constant zero
    pub fn is_zero(&self) -> bool {
        matches!(self, Expression::Constant(v) if *v == 0.)
    }

    /// Replace μ with a value and evaluate
    pub fn substitute(&self, mu: f64) -> f64 {
        match self {
            Expression::Constant(value) => *value,
            Expression::Mu => mu,
            Expression::Sum(l, r) => l.substitute(mu) + r.substitute(mu),
            Expression::Product(l, r) => l.substitute(mu) * r.substitute(mu),
            Expression::Quotient(l, r) => l.substitute(mu) / r.substitute(mu),
        }
    }

    /// Divide by a constant, which must be finite and non-zero
    pub fn div_const(self, divisor: f64) -> Result<Self, MeModelError> {
        if divisor == 0. || !divisor.is_finite() {
            return Err(MeModelError::InvalidParameter(format!(
                "can't divide a coefficient by {}",
                divisor
            )));
        }
        Ok(match self {
            Expression::Constant(value) => Expression::Constant(value / divisor),
            other => Expression::Quotient(Box::new(other), Box::new(Expression::Constant(divisor))),
        })
    }

    /// Divide by another expression
    ///
    /// A constant denominator goes through [`Expression::div_const`], so dividing by a
    /// constant zero is rejected. A symbolic denominator is kept as is.
    pub fn div(self, divisor: Expression) -> Result<Self, MeModelError> {
        match divisor {
            Expression::Constant(value) => self.div_const(value),
            other => Ok(Expression::Quotient(Box::new(self), Box::new(other))),
        }
    }

    /// Multiply by a constant
    pub fn scale(self, factor: f64) -> Self {
        self * Expression::Constant(factor)
    }
}

/// A keff must be a finite positive number
pub(crate) fn validate_keff(keff: f64) -> Result<(), MeModelError> {
    if keff > 0. && keff.is_finite() {
        Ok(())
    } else {
        Err(MeModelError::InvalidParameter(format!(
            "keff must be positive, got {}",
            keff
        )))
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Constant(value)
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Expression::Constant(l), Expression::Constant(r)) => Expression::Constant(l + r),
            (Expression::Constant(c), other) | (other, Expression::Constant(c)) if c == 0. => {
                other
            }
            (l, r) => Expression::Sum(Box::new(l), Box::new(r)),
        }
    }
}

impl Add<f64> for Expression {
    type Output = Expression;

    fn add(self, rhs: f64) -> Self::Output {
        self + Expression::Constant(rhs)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Expression::Constant(l), Expression::Constant(r)) => Expression::Constant(l * r),
            (Expression::Constant(c), _) | (_, Expression::Constant(c)) if c == 0. => {
                Expression::Constant(0.)
            }
            (Expression::Constant(c), other) | (other, Expression::Constant(c)) if c == 1. => {
                other
            }
            (l, r) => Expression::Product(Box::new(l), Box::new(r)),
        }
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Self::Output {
        self * Expression::Constant(rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output {
        self * Expression::Constant(-1.)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Mu => write!(f, "mu"),
            Expression::Sum(l, r) => write!(f, "({} + {})", l, r),
            Expression::Product(l, r) => write!(f, "{}*{}", Operand(l), Operand(r)),
            Expression::Quotient(l, r) => write!(f, "{}/{}", Operand(l), Operand(r)),
        }
    }
}

/// Operand of a product or quotient, compound operands are parenthesized
struct Operand<'a>(&'a Expression);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Expression::Product(..) | Expression::Quotient(..) => write!(f, "({})", self.0),
            other => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_fold() {
        let expr = Expression::constant(2.) * Expression::constant(3.) + Expression::constant(1.);
        assert_eq!(expr, Expression::Constant(7.));
        assert!(expr.is_constant());
        assert!(!expr.depends_on_mu());
    }

    #[test]
    fn identities_are_dropped() {
        assert_eq!(Expression::mu() * 1., Expression::Mu);
        assert_eq!(Expression::mu() + 0., Expression::Mu);
        assert!((Expression::mu() * 0.).is_zero());
    }

    #[test]
    fn substitution_is_uniform() {
        let constant = Expression::constant(-4.);
        assert_eq!(constant.substitute(0.1), -4.);
        assert_eq!(constant.substitute(2.), -4.);

        // -(mu + 0.391) / 22.7
        let coupling = -(Expression::mu() + 0.391).div_const(22.7).unwrap();
        assert!(coupling.depends_on_mu());
        assert!((coupling.substitute(0.5) + 0.891 / 22.7).abs() < 1e-12);
    }

    #[test]
    fn dividing_by_zero_is_rejected() {
        assert!(matches!(
            Expression::mu().div_const(0.),
            Err(MeModelError::InvalidParameter(_))
        ));
        assert!(Expression::mu().div(Expression::zero()).is_err());
        assert!(Expression::dilution(-3.).is_err());
        assert!(Expression::dilution(f64::NAN).is_err());
    }

    #[test]
    fn symbolic_denominator() {
        let k_ribo = (Expression::mu() * 22.7).div(Expression::mu() + 0.391).unwrap();
        assert!((k_ribo.substitute(0.391) - 22.7 / 2.).abs() < 1e-12);
    }

    #[test]
    fn display() {
        let expr = Expression::dilution(10.).unwrap().scale(-2.);
        assert_eq!(format!("{}", expr), "(mu/36000)*-2");
    }

    #[test]
    fn display_groups_operands() {
        let a = || Expression::mu();
        let b = || Expression::constant(2.);
        let c = || Expression::mu() + 1.;
        let nested_denominator = a().div(b() * c()).unwrap();
        let nested_numerator = a().div(b()).unwrap() * c();
        assert_eq!(nested_denominator.to_string(), "mu/(2*(mu + 1))");
        assert_eq!(nested_numerator.to_string(), "(mu/2)*(mu + 1)");
        assert_ne!(nested_denominator.to_string(), nested_numerator.to_string());
    }
}
