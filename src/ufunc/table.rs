//! Every loop posit8_2 installs, by ufunc name.

use crate::{
    number_representations::posit::posit8_2::Posit8_2,
    ufunc::{LoopBinding, functors::*},
};

type P8 = Posit8_2;

macro_rules! unary {
    ($($name:literal => $functor:ty),* $(,)?) => {
        vec![$(LoopBinding::unary::<P8, P8, $functor>($name)),*]
    };
}

macro_rules! binary {
    ($($name:literal => $functor:ty),* $(,)?) => {
        vec![$(LoopBinding::binary::<P8, P8, P8, $functor>($name)),*]
    };
}

macro_rules! predicate {
    ($($name:literal => $functor:ty),* $(,)?) => {
        vec![$(LoopBinding::unary::<P8, bool, $functor>($name)),*]
    };
}

fn arithmetic<F>(name: &'static str) -> Vec<LoopBinding>
where
    F: crate::ufunc::BinaryFunctor<P8, P8, P8>
        + crate::ufunc::BinaryFunctor<P8, f32, P8>
        + crate::ufunc::BinaryFunctor<f32, P8, P8>
        + crate::ufunc::BinaryFunctor<P8, f64, P8>
        + crate::ufunc::BinaryFunctor<f64, P8, P8>,
{
    vec![
        LoopBinding::binary::<P8, P8, P8, F>(name),
        LoopBinding::binary::<P8, f32, P8, F>(name),
        LoopBinding::binary::<f32, P8, P8, F>(name),
        LoopBinding::binary::<P8, f64, P8, F>(name),
        LoopBinding::binary::<f64, P8, P8, F>(name),
    ]
}

fn comparison<F>(name: &'static str) -> Vec<LoopBinding>
where
    F: crate::ufunc::BinaryFunctor<P8, P8, bool>
        + crate::ufunc::BinaryFunctor<P8, f32, bool>
        + crate::ufunc::BinaryFunctor<P8, f64, bool>,
{
    vec![
        LoopBinding::binary::<P8, P8, bool, F>(name),
        LoopBinding::binary::<P8, f32, bool, F>(name),
        LoopBinding::binary::<P8, f64, bool, F>(name),
    ]
}

pub fn bindings() -> Vec<LoopBinding> {
    let mut table = Vec::new();

    table.extend(arithmetic::<Add>("add"));
    table.extend(arithmetic::<Subtract>("subtract"));
    table.extend(arithmetic::<Multiply>("multiply"));
    table.extend(arithmetic::<TrueDivide>("divide"));
    table.extend(arithmetic::<TrueDivide>("true_divide"));

    table.extend(binary!(
        "floor_divide" => FloorDivide,
        "remainder" => Remainder,
        "mod" => Remainder,
        "fmod" => Fmod,
        "power" => Power,
        "logaddexp" => LogAddExp,
        "logaddexp2" => LogAddExp2,
        "heaviside" => Heaviside,
        "arctan2" => Arctan2,
        "hypot" => Hypot,
        "copysign" => CopySign,
        "maximum" => Maximum,
        "minimum" => Minimum,
        "fmax" => Fmax,
        "fmin" => Fmin,
        "nextafter" => NextAfter,
    ));
    table.push(LoopBinding::binary2::<P8, P8, P8, P8, Divmod>("divmod"));

    table.extend(unary!(
        "negative" => Negative,
        "positive" => Positive,
        "absolute" => Abs,
        "fabs" => Abs,
        "rint" => Rint,
        "sign" => Sign,
        "conjugate" => Conjugate,
        "exp" => Exp,
        "exp2" => Exp2,
        "expm1" => Expm1,
        "log" => Log,
        "log2" => Log2,
        "log10" => Log10,
        "log1p" => Log1p,
        "sqrt" => Sqrt,
        "square" => Square,
        "cbrt" => Cbrt,
        "reciprocal" => Reciprocal,
        "sin" => Sin,
        "cos" => Cos,
        "tan" => Tan,
        "arcsin" => Arcsin,
        "arccos" => Arccos,
        "arctan" => Arctan,
        "sinh" => Sinh,
        "cosh" => Cosh,
        "tanh" => Tanh,
        "arcsinh" => Arcsinh,
        "arccosh" => Arccosh,
        "arctanh" => Arctanh,
        "deg2rad" => Deg2rad,
        "rad2deg" => Rad2deg,
        "floor" => Floor,
        "ceil" => Ceil,
        "trunc" => Trunc,
    ));

    table.extend(comparison::<Eq>("equal"));
    table.extend(comparison::<Ne>("not_equal"));
    table.extend(comparison::<Lt>("less"));
    table.extend(comparison::<Gt>("greater"));
    table.extend(comparison::<Le>("less_equal"));
    table.extend(comparison::<Ge>("greater_equal"));

    table.extend(predicate!(
        "isfinite" => IsFinite,
        "isinf" => IsInf,
        "isnan" => IsNan,
        "signbit" => SignBit,
    ));

    table.push(LoopBinding::unary2::<P8, P8, P8, Modf>("modf"));
    table.push(LoopBinding::unary2::<P8, P8, i32, Frexp>("frexp"));
    table.push(LoopBinding::binary::<P8, i32, P8, Ldexp>("ldexp"));

    table
}
