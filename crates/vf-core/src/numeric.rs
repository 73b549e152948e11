/// Clamp a volume fraction to [0, 1]. VOF advection can over/undershoot by
/// a few ulps and densities must stay convex combinations.
pub fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.25), 0.0);
        assert_eq!(clamp_unit(0.5), 0.5);
        assert_eq!(clamp_unit(1.0 + 1e-9), 1.0);
    }
}
