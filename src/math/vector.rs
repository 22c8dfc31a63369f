//! Flat `f32` vector primitives.
//!
//! Every operation comes in two forms: an allocating one that returns a
//! fresh `Vec<f32>`, and an `_into` one that writes into a caller-supplied
//! buffer so hot paths (layer caches, gradient scratch) allocate nothing.
//! Length disagreements between operands or a supplied destination fail
//! with [`NetError::ShapeMismatch`].

use crate::error::{NetError, Result};

fn check_len(op: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetError::shape(op, expected.to_string(), actual.to_string()));
    }
    Ok(())
}

pub fn add(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    let mut out = vec![0.0; a.len()];
    add_into(a, b, &mut out)?;
    Ok(out)
}

pub fn add_into(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
    check_len("vector::add", a.len(), b.len())?;
    check_len("vector::add (destination)", a.len(), out.len())?;
    for i in 0..a.len() {
        out[i] = a[i] + b[i];
    }
    Ok(())
}

/// `a[i] += b[i]`, in place.
pub fn add_assign(a: &mut [f32], b: &[f32]) -> Result<()> {
    check_len("vector::add_assign", a.len(), b.len())?;
    for i in 0..a.len() {
        a[i] += b[i];
    }
    Ok(())
}

pub fn sub(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    let mut out = vec![0.0; a.len()];
    sub_into(a, b, &mut out)?;
    Ok(out)
}

pub fn sub_into(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
    check_len("vector::sub", a.len(), b.len())?;
    check_len("vector::sub (destination)", a.len(), out.len())?;
    for i in 0..a.len() {
        out[i] = a[i] - b[i];
    }
    Ok(())
}

/// `a[i] -= b[i]`, in place. Used for parameter updates.
pub fn sub_assign(a: &mut [f32], b: &[f32]) -> Result<()> {
    check_len("vector::sub_assign", a.len(), b.len())?;
    for i in 0..a.len() {
        a[i] -= b[i];
    }
    Ok(())
}

/// Elementwise (Hadamard) product.
pub fn mul(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    let mut out = vec![0.0; a.len()];
    mul_into(a, b, &mut out)?;
    Ok(out)
}

pub fn mul_into(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
    check_len("vector::mul", a.len(), b.len())?;
    check_len("vector::mul (destination)", a.len(), out.len())?;
    for i in 0..a.len() {
        out[i] = a[i] * b[i];
    }
    Ok(())
}

pub fn scale(a: &[f32], s: f32) -> Vec<f32> {
    a.iter().map(|x| x * s).collect()
}

pub fn scale_into(a: &[f32], s: f32, out: &mut [f32]) -> Result<()> {
    check_len("vector::scale (destination)", a.len(), out.len())?;
    for i in 0..a.len() {
        out[i] = a[i] * s;
    }
    Ok(())
}

/// Clamps every component into `[lo, hi]`, in place.
pub fn clamp(a: &mut [f32], lo: f32, hi: f32) {
    for x in a.iter_mut() {
        *x = x.clamp(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_sub() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(add(&a, &b).unwrap(), vec![5.0, 7.0, 9.0]);
        assert_eq!(sub(&b, &a).unwrap(), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let a = [1.0, 2.0];
        let b = [1.0, 2.0, 3.0];
        assert!(add(&a, &b).is_err());
        assert!(mul(&a, &b).is_err());
        let mut short = [0.0; 1];
        assert!(add_into(&a, &[3.0, 4.0], &mut short).is_err());
    }

    #[test]
    fn hadamard_and_scale() {
        let a = [1.0, -2.0, 3.0];
        let b = [2.0, 2.0, 2.0];
        assert_eq!(mul(&a, &b).unwrap(), vec![2.0, -4.0, 6.0]);
        assert_eq!(scale(&a, 0.5), vec![0.5, -1.0, 1.5]);
    }

    #[test]
    fn in_place_update_ops() {
        let mut a = [1.0, 1.0];
        add_assign(&mut a, &[2.0, 3.0]).unwrap();
        assert_eq!(a, [3.0, 4.0]);
        sub_assign(&mut a, &[1.0, 1.0]).unwrap();
        assert_eq!(a, [2.0, 3.0]);
    }

    #[test]
    fn clamp_bounds_components() {
        let mut a = [-10.0, 0.5, 10.0];
        clamp(&mut a, -5.0, 5.0);
        assert_eq!(a, [-5.0, 0.5, 5.0]);
    }
}
