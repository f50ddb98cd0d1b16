//! Buffer-level operations installed in the posit8_2 descriptor.

use std::cmp::Ordering;

use crate::{
    convert::{CastContext, CastPolicy, HostScalar, cast_to_posit8},
    dtype::{ArrayHooks, Element, SetItemFn},
    error::CastError,
    number_representations::posit::posit8_2::Posit8_2,
    strided::{StridedView, StridedViewMut},
};

pub fn getitem(data: &[u8]) -> HostScalar {
    HostScalar::Posit8(Posit8_2::load(data))
}

pub fn setitem<const CHECK_OVERFLOW: bool>(
    item: &HostScalar,
    data: &mut [u8],
    ctx: CastContext<'_>,
) -> Result<(), CastError> {
    let policy = CastPolicy {
        check_overflow: CHECK_OVERFLOW,
    };
    cast_to_posit8(item, ctx, policy)?.store(data);
    Ok(())
}

// Elements are a single byte, so there is never anything to swap.
pub fn copyswap(dst: &mut [u8], src: Option<&[u8]>, _swap: bool) {
    if let (Some(&byte), Some(slot)) = (src.and_then(|s| s.first()), dst.first_mut()) {
        *slot = byte;
    }
}

pub fn copyswapn(
    dst: &mut StridedViewMut<'_>,
    src: Option<&StridedView<'_>>,
    n: usize,
    _swap: bool,
) {
    let Some(src) = src else {
        return;
    };
    for i in 0..n.min(dst.len()).min(src.len()) {
        if let (Some(&byte), Some(slot)) = (src.element(i).first(), dst.element_mut(i).first_mut()) {
            *slot = byte;
        }
    }
}

/// NaR counts as nonzero.
pub fn nonzero(data: &[u8]) -> bool {
    Posit8_2::load(data) != Posit8_2::ZERO
}

/// Continues the arithmetic progression set by the first two elements.
pub fn fill(buffer: &mut [u8]) {
    if buffer.len() < 2 {
        return;
    }
    let start = f32::from(Posit8_2::load(&buffer[0..1]));
    let delta = f32::from(Posit8_2::load(&buffer[1..2])) - start;
    for (i, slot) in buffer.iter_mut().enumerate().skip(2) {
        <Posit8_2 as From<f32>>::from(start + i as f32 * delta).store(std::slice::from_mut(slot));
    }
}

/// Accumulates in `f32` and rounds once at the end.
pub fn dot(a: &StridedView<'_>, b: &StridedView<'_>, out: &mut [u8], n: usize) {
    let mut acc = 0.0_f32;
    for i in 0..n {
        acc += f32::from(Posit8_2::load(a.element(i))) * f32::from(Posit8_2::load(b.element(i)));
    }
    <Posit8_2 as From<f32>>::from(acc).store(out);
}

/// Total order for sorting: NaR after every real.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    Posit8_2::load(a).total_cmp(&Posit8_2::load(b))
}

/// Index of the first largest real. NaR is skipped; 0 when nothing qualifies.
pub fn argmax(data: &[u8], n: usize) -> usize {
    let mut max_val = f32::NEG_INFINITY;
    let mut max_ind = 0;
    for (i, raw) in data.iter().take(n).enumerate() {
        let value = f32::from(Posit8_2::from_bits(*raw));
        if value > max_val {
            max_val = value;
            max_ind = i;
        }
    }
    max_ind
}

pub fn argmin(data: &[u8], n: usize) -> usize {
    let mut min_val = f32::INFINITY;
    let mut min_ind = 0;
    for (i, raw) in data.iter().take(n).enumerate() {
        let value = f32::from(Posit8_2::from_bits(*raw));
        if value < min_val {
            min_val = value;
            min_ind = i;
        }
    }
    min_ind
}

pub fn posit8_hooks(check_overflow: bool) -> ArrayHooks {
    let setitem: SetItemFn = if check_overflow {
        setitem::<true>
    } else {
        setitem::<false>
    };
    ArrayHooks {
        getitem: Some(getitem),
        setitem: Some(setitem),
        copyswap: Some(copyswap),
        copyswapn: Some(copyswapn),
        nonzero: Some(nonzero),
        fill: Some(fill),
        dot: Some(dot),
        compare: Some(compare),
        argmax: Some(argmax),
        argmin: Some(argmin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{convert::CastLookup, dtype::DType, runtime::CastFn};

    struct NoCasts;

    impl CastLookup for NoCasts {
        fn cast_function(&self, _from: DType, _to: DType) -> Option<CastFn> {
            None
        }
    }

    fn bits(values: &[f32]) -> Vec<u8> {
        values
            .iter()
            .map(|v| <Posit8_2 as From<f32>>::from(*v).to_bits())
            .collect()
    }

    #[test]
    fn test_get_and_set_item() {
        let ctx = CastContext {
            lookup: &NoCasts,
            posit: DType::User(256),
        };
        let mut slot = [0u8; 1];
        setitem::<false>(&HostScalar::Float(2.5), &mut slot, ctx).unwrap();
        assert_eq!(slot, [0x4A]);
        assert_eq!(getitem(&slot), HostScalar::Posit8(Posit8_2::from_bits(0x4A)));

        let err = setitem::<false>(&HostScalar::None, &mut slot, ctx).unwrap_err();
        assert_eq!(err.to_string(), "expected number, got NoneType");
        assert_eq!(slot, [0x4A]);

        assert!(setitem::<true>(&HostScalar::Float(1.0e12), &mut slot, ctx).is_err());
        assert!(setitem::<false>(&HostScalar::Float(1.0e12), &mut slot, ctx).is_ok());
        assert_eq!(slot, [0x7F]);
    }

    #[test]
    fn test_fill_extrapolates() {
        let mut buffer = bits(&[1.0, 2.0, 0.0, 0.0, 0.0]);
        fill(&mut buffer);
        assert_eq!(buffer, bits(&[1.0, 2.0, 3.0, 4.0, 5.0]));

        let mut short = bits(&[1.0]);
        fill(&mut short);
        assert_eq!(short, bits(&[1.0]));
    }

    #[test]
    fn test_dot_over_strides() {
        let a = bits(&[1.0, 9.0, 2.0, 9.0, 3.0]);
        let b = bits(&[0.5, 0.5, 0.5]);
        let a_view = StridedView::new(&a, 0, 2, 1, 3).unwrap();
        let b_view = StridedView::contiguous(&b, 1);
        let mut out = [0u8; 1];
        dot(&a_view, &b_view, &mut out, 3);
        assert_eq!(out, [<Posit8_2 as From<f32>>::from(3.0).to_bits()]);
    }

    #[test]
    fn test_compare_sorts_nar_last() {
        let mut values = vec![0x80, 0x40, 0xC0, 0x00, 0x7F, 0x81];
        values.sort_by(|a, b| compare(std::slice::from_ref(a), std::slice::from_ref(b)));
        assert_eq!(values, vec![0x81, 0xC0, 0x00, 0x40, 0x7F, 0x80]);
        assert_eq!(compare(&[0x80], &[0x80]), Ordering::Equal);
    }

    #[test]
    fn test_arg_extrema_skip_nar() {
        let data = [0x80, 0x40, 0x48, 0x48, 0xC0];
        assert_eq!(argmax(&data, data.len()), 2);
        assert_eq!(argmin(&data, data.len()), 4);
        assert_eq!(argmax(&[0x80, 0x80], 2), 0);
        assert_eq!(argmin(&[], 0), 0);
    }

    #[test]
    fn test_nonzero_and_copyswap() {
        assert!(!nonzero(&[0x00]));
        assert!(nonzero(&[0x80]));
        assert!(nonzero(&[0x01]));

        let mut dst = [0u8; 1];
        copyswap(&mut dst, Some(&[0x44]), true);
        assert_eq!(dst, [0x44]);
        copyswap(&mut dst, None, false);
        assert_eq!(dst, [0x44]);

        let src = [1u8, 2, 3];
        let mut out = [0u8; 3];
        {
            let mut dst_view = StridedViewMut::contiguous(&mut out, 1);
            let src_view = StridedView::new(&src, 2, -1, 1, 3).unwrap();
            copyswapn(&mut dst_view, Some(&src_view), 3, false);
        }
        assert_eq!(out, [3, 2, 1]);
    }

    #[test]
    fn test_copyswap_ignores_empty_slots() {
        let mut empty: [u8; 0] = [];
        copyswap(&mut empty, Some(&[0x44]), false);
        let mut dst = [0x11u8];
        copyswap(&mut dst, Some(&[]), false);
        assert_eq!(dst, [0x11]);

        // n larger than either view stops at the shorter one
        let src = [7u8, 8];
        let mut out = [0u8; 3];
        {
            let mut dst_view = StridedViewMut::contiguous(&mut out, 1);
            let src_view = StridedView::contiguous(&src, 1);
            copyswapn(&mut dst_view, Some(&src_view), 5, false);
        }
        assert_eq!(out, [7, 8, 0]);
    }
}
