//! Built-in functions.

use crate::error::EvalError;

/// Single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqr,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Cot,
    Exp,
    Ln,
    Lg,
    Ld,
    Abs,
    Frac,
    Int,
    Round,
    Floor,
    Ceil,
    Factorial,
    Sign,
}

/// Name table, including the German aliases found in saved models.
const FUNCTION_NAMES: &[(&str, Function)] = &[
    ("sqr", Function::Sqr),
    ("sqrt", Function::Sqrt),
    ("wurzel", Function::Sqrt),
    ("quadratwurzel", Function::Sqrt),
    ("sin", Function::Sin),
    ("cos", Function::Cos),
    ("tan", Function::Tan),
    ("cot", Function::Cot),
    ("exp", Function::Exp),
    ("ln", Function::Ln),
    ("log", Function::Ln),
    ("lg", Function::Lg),
    ("ld", Function::Ld),
    ("abs", Function::Abs),
    ("betrag", Function::Abs),
    ("absolutbetrag", Function::Abs),
    ("frac", Function::Frac),
    ("int", Function::Int),
    ("round", Function::Round),
    ("rnd", Function::Round),
    ("runden", Function::Round),
    ("floor", Function::Floor),
    ("abrunden", Function::Floor),
    ("ceil", Function::Ceil),
    ("aufrunden", Function::Ceil),
    ("factorial", Function::Factorial),
    ("fakultät", Function::Factorial),
    ("sign", Function::Sign),
    ("signum", Function::Sign),
    ("sgn", Function::Sign),
];

/// Largest argument whose factorial is finite.
const MAX_FACTORIAL: f64 = 170.0;

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        FUNCTION_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, function)| function)
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sqr => "sqr",
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cot => "cot",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Lg => "lg",
            Self::Ld => "ld",
            Self::Abs => "abs",
            Self::Frac => "frac",
            Self::Int => "int",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Factorial => "factorial",
            Self::Sign => "sign",
        }
    }

    pub fn apply(self, x: f64) -> Result<f64, EvalError> {
        let domain = || EvalError::Domain(self.name());
        Ok(match self {
            Self::Sqr => x * x,
            Self::Sqrt if x < 0.0 => return Err(domain()),
            Self::Sqrt => x.sqrt(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Cot => {
                let tan = x.tan();
                if tan.abs() < 1e-6 {
                    return Err(domain());
                }
                1.0 / tan
            }
            Self::Exp => x.exp(),
            Self::Ln | Self::Lg | Self::Ld if x <= 0.0 => return Err(domain()),
            Self::Ln => x.ln(),
            Self::Lg => x.log10(),
            Self::Ld => x.log2(),
            Self::Abs => x.abs(),
            Self::Frac => x % 1.0,
            Self::Int => x.trunc(),
            Self::Round => (x + 0.5).floor(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Factorial => factorial(x)?,
            Self::Sign => signum(x),
        })
    }
}

/// `n!` of the rounded magnitude, carrying the sign of `x`; `0! = 1`.
pub(crate) fn factorial(x: f64) -> Result<f64, EvalError> {
    if x == 0.0 {
        return Ok(1.0);
    }
    let n = x.abs().round();
    if n > MAX_FACTORIAL {
        return Err(EvalError::NonFinite);
    }
    let mut product = 1.0;
    let mut k = 2.0;
    while k <= n {
        product *= k;
        k += 1.0;
    }
    Ok(signum(x) * product)
}

/// Sign with `signum(0) == 0`.
fn signum(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x.signum() }
}

/// Functions taking a `;`-separated argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
    Sum,
    Mean,
}

impl Aggregate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "sum" => Some(Self::Sum),
            "mean" => Some(Self::Mean),
            _ => None,
        }
    }

    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Sum => values.iter().sum(),
            Self::Mean if values.is_empty() => 0.0,
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// Lookups into the statistics the expression is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFunction {
    /// `xml("...")`: the numeric value at the selector.
    Value,
    /// `xmlsum("...")`: sum over a distribution's density values.
    Sum,
    /// `xmlmean("...")`: mean of a distribution.
    Mean,
    /// `xmlsd("...")`: standard deviation of a distribution.
    StandardDeviation,
    /// `xmlcv("...")`: coefficient of variation of a distribution.
    Cv,
}

impl LookupFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "xml" => Some(Self::Value),
            "xmlsum" => Some(Self::Sum),
            "xmlmean" => Some(Self::Mean),
            "xmlsd" => Some(Self::StandardDeviation),
            "xmlcv" => Some(Self::Cv),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "xml",
            Self::Sum => "xmlsum",
            Self::Mean => "xmlmean",
            Self::StandardDeviation => "xmlsd",
            Self::Cv => "xmlcv",
        }
    }
}
