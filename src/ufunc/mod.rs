//! Vectorized loops over strided buffers.
//!
//! A loop applies one functor element by element. Each loop shape is
//! monomorphized per (element types, functor) pair and handed to the runtime
//! as a plain function pointer.

pub mod functors;
pub mod table;

use crate::{
    dtype::{DType, Element, ElementKind},
    error::ArithmeticError,
    fenv::FpEnv,
    strided::{StridedView, StridedViewMut},
};

pub struct LoopArgs<'a> {
    pub inputs: Vec<StridedView<'a>>,
    pub outputs: Vec<StridedViewMut<'a>>,
    pub len: usize,
}

pub type LoopFn = fn(&mut LoopArgs<'_>) -> Result<(), ArithmeticError>;

pub trait UnaryFunctor<In, Out> {
    fn call(a: In) -> Out;
}

pub trait UnaryFunctor2<In, Out1, Out2> {
    fn call(a: In) -> (Out1, Out2);
}

pub trait BinaryFunctor<A, B, Out> {
    fn call(a: A, b: B) -> Out;
}

pub trait BinaryFunctor2<A, B, Out1, Out2> {
    fn call(a: A, b: B) -> (Out1, Out2);
}

pub fn unary_loop<In, Out, F>(args: &mut LoopArgs<'_>) -> Result<(), ArithmeticError>
where
    In: Element,
    Out: Element,
    F: UnaryFunctor<In, Out>,
{
    let input = args.inputs[0];
    let output = &mut args.outputs[0];
    for k in 0..args.len {
        let x = In::load(input.element(k));
        F::call(x).store(output.element_mut(k));
    }
    Ok(())
}

pub fn unary_loop2<In, Out1, Out2, F>(args: &mut LoopArgs<'_>) -> Result<(), ArithmeticError>
where
    In: Element,
    Out1: Element,
    Out2: Element,
    F: UnaryFunctor2<In, Out1, Out2>,
{
    debug_assert_eq!(args.outputs.len(), 2, "two-output loop");
    let input = args.inputs[0];
    let (o0, o1) = args.outputs.split_at_mut(1);
    let (o0, o1) = (&mut o0[0], &mut o1[0]);
    for k in 0..args.len {
        let (first, second) = F::call(In::load(input.element(k)));
        first.store(o0.element_mut(k));
        second.store(o1.element_mut(k));
    }
    Ok(())
}

/// Two inputs, one output. Exception flags raised anywhere in the batch are
/// reported once, as the most severe one, after every element is written.
pub fn binary_loop<A, B, Out, F>(args: &mut LoopArgs<'_>) -> Result<(), ArithmeticError>
where
    A: Element,
    B: Element,
    Out: Element,
    F: BinaryFunctor<A, B, Out>,
{
    let env = FpEnv::hold();
    let (i0, i1) = (args.inputs[0], args.inputs[1]);
    let output = &mut args.outputs[0];
    for k in 0..args.len {
        let x = A::load(i0.element(k));
        let y = B::load(i1.element(k));
        F::call(x, y).store(output.element_mut(k));
    }
    env.finish()
}

pub fn binary_loop2<A, B, Out1, Out2, F>(args: &mut LoopArgs<'_>) -> Result<(), ArithmeticError>
where
    A: Element,
    B: Element,
    Out1: Element,
    Out2: Element,
    F: BinaryFunctor2<A, B, Out1, Out2>,
{
    debug_assert_eq!(args.outputs.len(), 2, "two-output loop");
    let (i0, i1) = (args.inputs[0], args.inputs[1]);
    let (o0, o1) = args.outputs.split_at_mut(1);
    let (o0, o1) = (&mut o0[0], &mut o1[0]);
    for k in 0..args.len {
        let (first, second) = F::call(A::load(i0.element(k)), B::load(i1.element(k)));
        first.store(o0.element_mut(k));
        second.store(o1.element_mut(k));
    }
    Ok(())
}

/// One loop for one ufunc, with its signature still in element kinds.
#[derive(Debug, Clone)]
pub struct LoopBinding {
    pub name: &'static str,
    pub signature: Vec<ElementKind>,
    pub func: LoopFn,
}

impl LoopBinding {
    pub fn unary<In, Out, F>(name: &'static str) -> Self
    where
        In: Element,
        Out: Element,
        F: UnaryFunctor<In, Out>,
    {
        LoopBinding {
            name,
            signature: vec![In::KIND, Out::KIND],
            func: unary_loop::<In, Out, F>,
        }
    }

    pub fn unary2<In, Out1, Out2, F>(name: &'static str) -> Self
    where
        In: Element,
        Out1: Element,
        Out2: Element,
        F: UnaryFunctor2<In, Out1, Out2>,
    {
        LoopBinding {
            name,
            signature: vec![In::KIND, Out1::KIND, Out2::KIND],
            func: unary_loop2::<In, Out1, Out2, F>,
        }
    }

    pub fn binary<A, B, Out, F>(name: &'static str) -> Self
    where
        A: Element,
        B: Element,
        Out: Element,
        F: BinaryFunctor<A, B, Out>,
    {
        LoopBinding {
            name,
            signature: vec![A::KIND, B::KIND, Out::KIND],
            func: binary_loop::<A, B, Out, F>,
        }
    }

    pub fn binary2<A, B, Out1, Out2, F>(name: &'static str) -> Self
    where
        A: Element,
        B: Element,
        Out1: Element,
        Out2: Element,
        F: BinaryFunctor2<A, B, Out1, Out2>,
    {
        LoopBinding {
            name,
            signature: vec![A::KIND, B::KIND, Out1::KIND, Out2::KIND],
            func: binary_loop2::<A, B, Out1, Out2, F>,
        }
    }

    pub fn resolve(&self, posit: DType) -> Vec<DType> {
        self.signature.iter().map(|kind| kind.resolve(posit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{functors::*, *};
    use crate::{
        error::ArithmeticError,
        fenv::{self, FpExceptions},
        number_representations::posit::posit8_2::Posit8_2,
    };

    fn p(value: f32) -> Posit8_2 {
        <Posit8_2 as From<f32>>::from(value)
    }

    #[test]
    fn test_binary_loop_with_mixed_strides() {
        // a is read backwards, b is broadcast, out is written every other byte.
        let a = [p(1.0).to_bits(), p(2.0).to_bits(), p(3.0).to_bits()];
        let b = [p(0.5).to_bits()];
        let mut out = [0u8; 6];
        {
            let mut args = LoopArgs {
                inputs: vec![
                    StridedView::new(&a, 2, -1, 1, 3).unwrap(),
                    StridedView::new(&b, 0, 0, 1, 3).unwrap(),
                ],
                outputs: vec![StridedViewMut::new(&mut out, 0, 2, 1, 3).unwrap()],
                len: 3,
            };
            binary_loop::<Posit8_2, Posit8_2, Posit8_2, Multiply>(&mut args).unwrap();
        }
        assert_eq!(out, [p(1.5).to_bits(), 0, p(1.0).to_bits(), 0, p(0.5).to_bits(), 0]);
    }

    #[test]
    fn test_binary_loop_reports_once_and_restores_flags() {
        fenv::clear(FpExceptions::ALL);
        fenv::raise(FpExceptions::UNDERFLOW);

        let a = [p(1.0).to_bits(), p(0.0).to_bits(), p(4.0).to_bits()];
        let b = [p(0.0).to_bits(), p(0.0).to_bits(), p(2.0).to_bits()];
        let mut out = [0u8; 3];
        let result = {
            let mut args = LoopArgs {
                inputs: vec![StridedView::contiguous(&a, 1), StridedView::contiguous(&b, 1)],
                outputs: vec![StridedViewMut::contiguous(&mut out, 1)],
                len: 3,
            };
            binary_loop::<Posit8_2, Posit8_2, Posit8_2, TrueDivide>(&mut args)
        };
        // 0/0 is invalid, which outranks the 1/0 divide-by-zero.
        assert_eq!(result, Err(ArithmeticError::Invalid));
        assert_eq!(out, [0x80, 0x80, p(2.0).to_bits()]);
        assert_eq!(fenv::test(FpExceptions::ALL), FpExceptions::UNDERFLOW);
        fenv::clear(FpExceptions::ALL);
    }

    #[test]
    fn test_two_output_loops() {
        let a = [p(-7.0).to_bits(), p(7.0).to_bits()];
        let b = [p(2.0).to_bits(), p(2.0).to_bits()];
        let (mut q, mut r) = ([0u8; 2], [0u8; 2]);
        {
            let mut args = LoopArgs {
                inputs: vec![StridedView::contiguous(&a, 1), StridedView::contiguous(&b, 1)],
                outputs: vec![
                    StridedViewMut::contiguous(&mut q, 1),
                    StridedViewMut::contiguous(&mut r, 1),
                ],
                len: 2,
            };
            binary_loop2::<Posit8_2, Posit8_2, Posit8_2, Posit8_2, Divmod>(&mut args).unwrap();
        }
        assert_eq!(q, [p(-4.0).to_bits(), p(3.0).to_bits()]);
        assert_eq!(r, [p(1.0).to_bits(), p(1.0).to_bits()]);

        let x = [p(6.0).to_bits()];
        let mut mantissa = [0u8; 1];
        let mut exponent = [0u8; 4];
        {
            let mut args = LoopArgs {
                inputs: vec![StridedView::contiguous(&x, 1)],
                outputs: vec![
                    StridedViewMut::contiguous(&mut mantissa, 1),
                    StridedViewMut::contiguous(&mut exponent, 4),
                ],
                len: 1,
            };
            unary_loop2::<Posit8_2, Posit8_2, i32, Frexp>(&mut args).unwrap();
        }
        assert_eq!(mantissa, [p(0.75).to_bits()]);
        assert_eq!(i32::from_ne_bytes(exponent), 3);
    }

    #[test]
    #[should_panic]
    fn test_two_output_loop_refuses_single_output() {
        let x = [p(6.0).to_bits()];
        let mut mantissa = [0u8; 1];
        let mut args = LoopArgs {
            inputs: vec![StridedView::contiguous(&x, 1)],
            outputs: vec![StridedViewMut::contiguous(&mut mantissa, 1)],
            len: 1,
        };
        let _ = unary_loop2::<Posit8_2, Posit8_2, Posit8_2, Modf>(&mut args);
    }

    #[test]
    fn test_binding_signatures() {
        let posit = DType::User(300);
        let binding = LoopBinding::binary::<Posit8_2, f32, Posit8_2, Add>("add");
        assert_eq!(binding.resolve(posit), vec![posit, DType::Float32, posit]);
        let frexp = LoopBinding::unary2::<Posit8_2, Posit8_2, i32, Frexp>("frexp");
        assert_eq!(frexp.resolve(posit), vec![posit, posit, DType::Int32]);
    }
}
