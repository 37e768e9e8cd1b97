//! Index helpers shared by the basis-dependent operator builders.

/// Kronecker delta: `1` if `i == j`, else `0`.
pub fn kron_delta<T>(i: T, j: T) -> usize
where T: PartialEq
{
    usize::from(i == j)
}

/// Kronecker delta as a real factor, for use directly in matrix elements.
pub fn kron_delta_f<T>(i: T, j: T) -> f64
where T: PartialEq
{
    if i == j { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta() {
        assert_eq!(kron_delta(3, 3), 1);
        assert_eq!(kron_delta(3, 4), 0);
        assert_eq!(kron_delta(0_usize, 0), 1);
        assert_eq!(kron_delta_f('a', 'a'), 1.0);
        assert_eq!(kron_delta_f('a', 'b'), 0.0);
    }
}
