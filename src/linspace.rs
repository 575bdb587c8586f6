use num::Float;

/// Evenly spaced samples over `[min, max]`, inclusive on both ends.
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = if n > 1 {
            // n - 1 always fits in the float range we sample over
            let num_steps = F::from(n - 1).unwrap_or_else(F::one);
            (max - min) / num_steps
        } else {
            F::zero()
        };
        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does
            let i = F::from(self.index)?;
            self.index += 1;
            Some(self.start + self.step * i)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace_endpoints() {
    let points: Vec<f64> = Linspace::new(0., 10., 11).collect();

    assert_eq!(points.len(), 11);
    assert_eq!(points[0], 0.);
    assert_eq!(points[10], 10.);
    assert_eq!(points[5], 5.);
}

#[test]
fn test_linspace_single_point() {
    let points: Vec<f64> = Linspace::new(3., 3., 1).collect();

    assert_eq!(points, vec![3.]);
}
