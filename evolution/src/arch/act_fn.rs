#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActFn {
    Tanh,
    Sigmoid { amp: f32 },
    Identity,
}

use ActFn::*;

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        Sigmoid { amp }
    }

    pub fn f(&self, x: f32) -> f32 {
        match *self {
            Tanh => x.tanh(),
            Sigmoid { amp } => amp / (1. + (-x).exp()),
            Identity => x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tanh_is_odd_and_bounded() {
        assert_eq!(Tanh.f(0.), 0.);
        assert!((Tanh.f(2.) + Tanh.f(-2.)).abs() < 1e-7);
        assert!(Tanh.f(100.) <= 1.);
    }

    #[test]
    fn sigmoid_scales_by_amp() {
        assert!((ActFn::sigmoid(2.).f(0.) - 1.).abs() < 1e-7);
    }
}
