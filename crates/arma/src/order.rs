//! ARMA model orders.

/// The `(p, q)` orders of an ARMA model.
///
/// # Example
///
/// ```
/// use regarima_arma::ArmaOrder;
///
/// let order = ArmaOrder::new(2, 1);
/// assert_eq!(order.r(), 2);
/// assert_eq!(order.n_params(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArmaOrder {
    p: usize,
    q: usize,
}

impl ArmaOrder {
    /// Creates an order with AR order `p` and MA order `q`.
    pub fn new(p: usize, q: usize) -> Self {
        Self { p, q }
    }

    /// Returns the AR order (`p`).
    pub fn p(&self) -> usize {
        self.p
    }

    /// Returns the MA order (`q`).
    pub fn q(&self) -> usize {
        self.q
    }

    /// State dimension (filter memory) `r = max(p, q + 1)`.
    pub fn r(&self) -> usize {
        self.p.max(self.q + 1)
    }

    /// Number of ARMA coefficients `p + q`.
    pub fn n_params(&self) -> usize {
        self.p + self.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_round_trip() {
        let order = ArmaOrder::new(2, 1);
        assert_eq!(order.p(), 2);
        assert_eq!(order.q(), 1);
    }

    #[test]
    fn state_dimension() {
        assert_eq!(ArmaOrder::new(0, 0).r(), 1);
        assert_eq!(ArmaOrder::new(1, 0).r(), 1);
        assert_eq!(ArmaOrder::new(0, 1).r(), 2);
        assert_eq!(ArmaOrder::new(3, 1).r(), 3);
        assert_eq!(ArmaOrder::new(1, 3).r(), 4);
    }

    #[test]
    fn order_is_copy_and_hashable() {
        use std::collections::HashSet;
        let a = ArmaOrder::new(1, 1);
        let b = a;
        let set: HashSet<ArmaOrder> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
