pub mod trips;
use std::borrow::Cow;

pub trait FromRaw<T> where Self: Sized {
  fn from_raw(raw: T, id: Cow<str>) -> Self;
}


pub mod metrics {
  use num_traits::{AsPrimitive, Num};

  pub trait Metric {

    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64;
  }


  pub struct Euclidean();

  impl Metric for Euclidean {

    fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64 {
      let a = p1.0.as_() - p2.0.as_();
      let b = p1.1.as_() - p2.1.as_();
      (a*a + b*b).sqrt()
    }
  }

  #[cfg(test)]
  mod tests {
    use super::*;

    #[test]
    fn euclidean_345() {
      assert_eq!(Euclidean::compute((0.0, 0.0), (3.0, 4.0)), 5.0);
      assert_eq!(Euclidean::compute((1i32, 1i32), (1i32, 1i32)), 0.0);
    }
  }
}
