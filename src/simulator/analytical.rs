use crate::simulator::*;

/// Relative gap between `ka` and `ke` below which the Bateman function is replaced
/// by its limit.
const RATE_COINCIDENCE: f64 = 1e-9;

/// Analytical solution for the one-state bolus model.
///
/// # Assumptions
/// - `p` is a vector of length 1 with the value of the elimination constant
/// - `x` is a vector of length 1 (central-compartment amount)
pub fn one_compartment(x: &V, p: &V, t: T) -> V {
    let mut xout = x.clone();
    let ke = p[0];

    xout[0] = x[0] * (-ke * t).exp();
    xout
}

/// Analytical solution for the one-compartment model with first-order absorption
/// (the Bateman function).
///
/// # Assumptions
/// - `p` is a vector of length 2 with ka and ke in that order
/// - `x` is a vector of length 2: absorption-site amount, central-compartment amount
pub fn one_compartment_with_absorption(x: &V, p: &V, t: T) -> V {
    let mut xout = x.clone();
    let ka = p[0];
    let ke = p[1];

    xout[0] = x[0] * (-ka * t).exp();

    let absorbed = if ((ka - ke) / ka).abs() < RATE_COINCIDENCE {
        // ka == ke: limit of the expression below
        ka * x[0] * t * (-ke * t).exp()
    } else {
        ((ka * x[0]) / (ka - ke)) * ((-ke * t).exp() - (-ka * t).exp())
    };
    xout[1] = x[1] * (-ke * t).exp() + absorbed;

    xout
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bolus_halves_every_half_life() {
        let ke = std::f64::consts::LN_2 / 6.0;
        let x = V::from_vec(vec![500.0]);
        let p = V::from_vec(vec![ke]);
        assert_relative_eq!(one_compartment(&x, &p, 0.0)[0], 500.0);
        assert_relative_eq!(one_compartment(&x, &p, 6.0)[0], 250.0, epsilon = 1e-10);
        assert_relative_eq!(one_compartment(&x, &p, 12.0)[0], 125.0, epsilon = 1e-10);
    }

    #[test]
    fn absorption_starts_empty() {
        let x = V::from_vec(vec![500.0, 0.0]);
        let p = V::from_vec(vec![1.0, 0.1]);
        let out = one_compartment_with_absorption(&x, &p, 0.0);
        assert_relative_eq!(out[0], 500.0);
        assert_relative_eq!(out[1], 0.0);
    }

    #[test]
    fn total_amount_never_increases() {
        // The total amount only decreases through elimination.
        let x = V::from_vec(vec![500.0, 0.0]);
        let p = V::from_vec(vec![1.0, 0.1]);
        let mut previous = 500.0;
        for t in [0.5, 1.0, 2.0, 4.0, 8.0, 24.0] {
            let out = one_compartment_with_absorption(&x, &p, t);
            let total = out[0] + out[1];
            assert!(total <= previous + 1e-12);
            previous = total;
        }
    }

    #[test]
    fn coincident_rates_use_the_limit() {
        let x = V::from_vec(vec![100.0, 0.0]);
        let equal = one_compartment_with_absorption(&x, &V::from_vec(vec![0.5, 0.5]), 2.0);
        let near = one_compartment_with_absorption(&x, &V::from_vec(vec![0.5 + 1e-6, 0.5]), 2.0);
        assert!(equal[1].is_finite());
        assert_relative_eq!(equal[1], 100.0 * 0.5 * 2.0 * (-1.0f64).exp(), epsilon = 1e-10);
        assert_relative_eq!(equal[1], near[1], epsilon = 1e-4);
    }
}
