//! A single directional target with two coordinate encodings.

use std::f64::consts::PI;
use std::fmt;

use super::DirId;
use crate::error::{Error, Result};

/// Full turn in theta. Theta is circular with this period; phi is not
/// wrapped.
pub const TWO_PI: f64 = 2.0 * PI;

/// An immutable directional point.
///
/// The primary pair `(theta, phi)` is given at construction; the
/// alternate pair is derived as `theta + π` (wrapped back into
/// `[0, 2π)`) and `-phi`. Both pairs denote the same physical
/// direction under the system's symmetry convention, so "switching
/// representation" is a choice of which pair to read, not a change of
/// target.
#[derive(Debug, Clone, PartialEq)]
pub struct Direction {
    pub id: DirId,
    theta: f64,
    theta_alt: f64,
    phi: f64,
    phi_alt: f64,
}

impl Direction {
    pub fn new(id: DirId, theta: f64, phi: f64) -> Self {
        let mut theta_alt = theta + PI;
        if theta_alt > TWO_PI {
            theta_alt = theta - PI;
        }
        Self {
            id,
            theta,
            theta_alt,
            phi,
            phi_alt: -phi,
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn theta_alt(&self) -> f64 {
        self.theta_alt
    }

    pub fn phi_alt(&self) -> f64 {
        self.phi_alt
    }

    /// Swaps the primary and alternate pairs in place.
    ///
    /// Legacy convenience used when the catalog builds its
    /// alternate-view entities; applying it twice restores the
    /// original pairs exactly.
    pub fn switch_rep(&mut self) {
        std::mem::swap(&mut self.theta, &mut self.theta_alt);
        std::mem::swap(&mut self.phi, &mut self.phi_alt);
    }

    /// Transition distance to another direction.
    pub fn dist_to(&self, other: &Direction) -> f64 {
        Direction::distance(self, other)
    }

    /// Chebyshev combination of the absolute phi difference and the
    /// toroidal theta difference.
    ///
    /// Symmetric, but not guaranteed to satisfy the triangle
    /// inequality across mixed representations. Consumers depend on
    /// this exact formula; do not alter it.
    pub fn distance(a: &Direction, b: &Direction) -> f64 {
        let dtheta = a.theta - b.theta;
        let theta_term = dtheta
            .abs()
            .min((dtheta + TWO_PI).abs())
            .min((dtheta - TWO_PI).abs());
        (a.phi - b.phi).abs().max(theta_term)
    }

    /// Parses the fixed textual form
    /// `Direction(id=<uint>,theta=<decimal>,phi=<decimal>)`.
    ///
    /// Whitespace anywhere in the text is ignored. Failure reports
    /// which part of the pattern did not match.
    pub fn parse(text: &str) -> Result<Self> {
        let compact: String = text.split_whitespace().collect();

        let fail = |reason: &str| Error::ParseDirection {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let inner = compact
            .strip_prefix("Direction(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| fail("expected the form `Direction(...)`"))?;

        let mut fields = inner.split(',');
        let id_text =
            take_field(&mut fields, "id").ok_or_else(|| fail("missing field `id`"))?;
        let theta_text =
            take_field(&mut fields, "theta").ok_or_else(|| fail("missing field `theta`"))?;
        let phi_text =
            take_field(&mut fields, "phi").ok_or_else(|| fail("missing field `phi`"))?;
        if fields.next().is_some() {
            return Err(fail("unexpected extra field"));
        }

        let id: DirId = id_text
            .parse()
            .map_err(|_| fail("`id` must be an unsigned integer"))?;
        let theta: f64 = theta_text
            .parse()
            .map_err(|_| fail("`theta` must be a decimal number"))?;
        let phi: f64 = phi_text
            .parse()
            .map_err(|_| fail("`phi` must be a decimal number"))?;

        Ok(Direction::new(id, theta, phi))
    }
}

/// Pulls the next `name=value` field off the comma-split iterator.
fn take_field<'a>(fields: &mut std::str::Split<'a, char>, name: &str) -> Option<&'a str> {
    fields.next()?.strip_prefix(name)?.strip_prefix('=')
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Direction(id={}, theta={}, phi={})",
            self.id, self.theta, self.phi
        )
    }
}
