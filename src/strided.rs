//! Byte-level strided views over array buffers.
//!
//! A view addresses `len` elements of `itemsize` bytes, the `i`-th starting at
//! `offset + i * stride`. Strides are in bytes and may be zero (broadcast) or
//! negative (reversed views). Bounds are checked once when the view is built.

use crate::error::RuntimeError;

fn check_bounds(
    buf_len: usize,
    offset: usize,
    stride: isize,
    itemsize: usize,
    len: usize,
) -> Result<(), RuntimeError> {
    if len == 0 {
        return Ok(());
    }
    let first = isize::try_from(offset).ok();
    let last = first
        .zip((len as isize - 1).checked_mul(stride))
        .and_then(|(first, span)| first.checked_add(span));

    for position in [first, last] {
        match position {
            Some(pos) if pos >= 0 && pos as usize + itemsize <= buf_len => {}
            _ => {
                return Err(RuntimeError::ViewOutOfBounds {
                    position: position.unwrap_or(isize::MAX),
                    len: buf_len,
                });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a> {
    data: &'a [u8],
    offset: usize,
    stride: isize,
    itemsize: usize,
    len: usize,
}

impl<'a> StridedView<'a> {
    pub fn new(
        data: &'a [u8],
        offset: usize,
        stride: isize,
        itemsize: usize,
        len: usize,
    ) -> Result<Self, RuntimeError> {
        check_bounds(data.len(), offset, stride, itemsize, len)?;
        Ok(StridedView {
            data,
            offset,
            stride,
            itemsize,
            len,
        })
    }

    pub fn contiguous(data: &'a [u8], itemsize: usize) -> Self {
        StridedView {
            data,
            offset: 0,
            stride: itemsize as isize,
            itemsize,
            len: data.len() / itemsize.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stride(&self) -> isize {
        self.stride
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    pub fn element(&self, index: usize) -> &'a [u8] {
        let start = (self.offset as isize + index as isize * self.stride) as usize;
        &self.data[start..start + self.itemsize]
    }
}

#[derive(Debug)]
pub struct StridedViewMut<'a> {
    data: &'a mut [u8],
    offset: usize,
    stride: isize,
    itemsize: usize,
    len: usize,
}

impl<'a> StridedViewMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        offset: usize,
        stride: isize,
        itemsize: usize,
        len: usize,
    ) -> Result<Self, RuntimeError> {
        check_bounds(data.len(), offset, stride, itemsize, len)?;
        Ok(StridedViewMut {
            data,
            offset,
            stride,
            itemsize,
            len,
        })
    }

    pub fn contiguous(data: &'a mut [u8], itemsize: usize) -> Self {
        let len = data.len() / itemsize.max(1);
        StridedViewMut {
            data,
            offset: 0,
            stride: itemsize as isize,
            itemsize,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stride(&self) -> isize {
        self.stride
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    fn start(&self, index: usize) -> usize {
        (self.offset as isize + index as isize * self.stride) as usize
    }

    pub fn element(&self, index: usize) -> &[u8] {
        let start = self.start(index);
        &self.data[start..start + self.itemsize]
    }

    pub fn element_mut(&mut self, index: usize) -> &mut [u8] {
        let start = self.start(index);
        &mut self.data[start..start + self.itemsize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_and_zero_strides() {
        let data = [1u8, 2, 3, 4];
        let reversed = StridedView::new(&data, 3, -1, 1, 4).unwrap();
        let collected: Vec<u8> = (0..reversed.len()).map(|i| reversed.element(i)[0]).collect();
        assert_eq!(collected, vec![4, 3, 2, 1]);

        let broadcast = StridedView::new(&data, 2, 0, 1, 10).unwrap();
        assert!((0..10).all(|i| broadcast.element(i) == [3]));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let data = [0u8; 8];
        assert!(StridedView::new(&data, 0, 4, 4, 3).is_err());
        assert!(StridedView::new(&data, 0, 4, 4, 2).is_ok());
        assert!(StridedView::new(&data, 1, -2, 1, 2).is_err());
        assert!(StridedView::new(&data, 100, 1, 1, 0).is_ok());

        let mut out = [0u8; 3];
        assert!(StridedViewMut::new(&mut out, 0, 2, 1, 3).is_err());
    }

    #[test]
    fn test_mutable_view_writes_through_stride() {
        let mut data = [0u8; 6];
        {
            let mut view = StridedViewMut::new(&mut data, 1, 2, 1, 3).unwrap();
            for i in 0..view.len() {
                view.element_mut(i)[0] = i as u8 + 1;
            }
        }
        assert_eq!(data, [0, 1, 0, 2, 0, 3]);
    }
}
