//! Native functions exposed as commands.
//!
//! A [`FunctionCommand`] pairs a native closure with an explicit list of
//! formal parameters. Calling it binds the caller's arguments to the formals,
//! coerces them, and negotiates the result kind:
//!
//! ```text
//! !take 2 "a b c"        formals: [Plain(Int), ArrayTail]
//!   bind  → Int(Some(2)), Array(["a b c"])
//!   kinds → [String, Empty] → native runs once → String("a b")
//! ```
//!
//! Missing arguments curry when a `Command` result is acceptable:
//! `!(!take 2) "a b c"` builds `AppliedCommand(take, [2])` first.

use std::fmt;
use std::num::IntErrorKind;
use std::sync::Arc;

use chatcmd_types::{CommandError, ResultKind};

use super::{AppliedCommand, Command, CommandRef, ExecContext, LazyCommand};
use crate::interpreter::{format_kinds, CommandResult};

/// The native body of a function command.
pub type NativeFn =
    Arc<dyn Fn(&mut ExecContext, &Params) -> anyhow::Result<NativeValue> + Send + Sync>;

/// Target type of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Int,
    /// Single precision.
    Float,
    Double,
    String,
    /// A type the kernel does not convert. Bound as raw text; the native parses it.
    Other(&'static str),
}

impl ParamType {
    /// Overload preference: lower ranks are tried first.
    pub fn rank(self) -> u8 {
        match self {
            ParamType::Int => 0,
            ParamType::Float => 1,
            ParamType::Double => 2,
            ParamType::String => 3,
            ParamType::Other(_) => 4,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Int => write!(f, "int"),
            ParamType::Float => write!(f, "float"),
            ParamType::Double => write!(f, "double"),
            ParamType::String => write!(f, "string"),
            ParamType::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Marks that the native reads the execution context. Consumes no argument.
    Context,
    /// All (unevaluated) arguments of the call. Consumes no argument.
    ArgsTail,
    /// The requested result kinds of the call. Consumes no argument.
    KindsTail,
    /// The next argument, coerced to the type.
    Plain(ParamType),
    /// Every remaining argument as a string. Only valid as the last positional parameter.
    ArrayTail,
}

impl Param {
    /// True for parameters that consume positional arguments.
    pub fn is_positional(self) -> bool {
        matches!(self, Param::Plain(_) | Param::ArrayTail)
    }
}

/// A bound parameter value, aligned with the formal list.
#[derive(Clone)]
pub enum Bound {
    Context,
    Arguments(Vec<CommandRef>),
    Kinds(Vec<ResultKind>),
    Str(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    Array(Vec<String>),
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Context => write!(f, "Context"),
            Bound::Arguments(args) => write!(f, "Arguments({})", args.len()),
            Bound::Kinds(kinds) => write!(f, "Kinds({})", format_kinds(kinds)),
            Bound::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Bound::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Bound::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Bound::Array(v) => f.debug_tuple("Array").field(v).finish(),
        }
    }
}

/// The bound parameters handed to a native body.
///
/// Accessors take the index of the formal parameter (special parameters
/// included) and fail with an internal error when the native asks for the
/// wrong shape.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: Vec<Bound>,
}

impl Params {
    pub fn new(values: Vec<Bound>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bound> {
        self.values.get(index)
    }

    fn bound(&self, index: usize) -> Result<&Bound, CommandError> {
        self.values
            .get(index)
            .ok_or_else(|| CommandError::Internal(format!("no parameter at index {index}")))
    }

    fn mismatch(index: usize, wanted: &str) -> CommandError {
        CommandError::Internal(format!("parameter {index} is not bound as {wanted}"))
    }

    fn missing(index: usize) -> CommandError {
        CommandError::arity(format!("missing argument {index}"))
    }

    /// An optional string (or `Other`-typed) parameter.
    pub fn opt_str(&self, index: usize) -> Result<Option<&str>, CommandError> {
        match self.bound(index)? {
            Bound::Str(value) => Ok(value.as_deref()),
            _ => Err(Self::mismatch(index, "string")),
        }
    }

    /// A string parameter that must be present.
    pub fn str(&self, index: usize) -> Result<&str, CommandError> {
        self.opt_str(index)?.ok_or_else(|| Self::missing(index))
    }

    pub fn opt_int(&self, index: usize) -> Result<Option<i64>, CommandError> {
        match self.bound(index)? {
            Bound::Int(value) => Ok(*value),
            _ => Err(Self::mismatch(index, "int")),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64, CommandError> {
        self.opt_int(index)?.ok_or_else(|| Self::missing(index))
    }

    pub fn opt_float(&self, index: usize) -> Result<Option<f64>, CommandError> {
        match self.bound(index)? {
            Bound::Float(value) => Ok(*value),
            _ => Err(Self::mismatch(index, "float")),
        }
    }

    pub fn float(&self, index: usize) -> Result<f64, CommandError> {
        self.opt_float(index)?.ok_or_else(|| Self::missing(index))
    }

    /// An array tail. Empty when no arguments were left.
    pub fn array(&self, index: usize) -> Result<&[String], CommandError> {
        match self.bound(index)? {
            Bound::Array(items) => Ok(items),
            _ => Err(Self::mismatch(index, "array")),
        }
    }

    pub fn arguments(&self, index: usize) -> Result<&[CommandRef], CommandError> {
        match self.bound(index)? {
            Bound::Arguments(args) => Ok(args),
            _ => Err(Self::mismatch(index, "arguments")),
        }
    }

    pub fn kinds(&self, index: usize) -> Result<&[ResultKind], CommandError> {
        match self.bound(index)? {
            Bound::Kinds(kinds) => Ok(kinds),
            _ => Err(Self::mismatch(index, "kinds")),
        }
    }
}

/// What a native body hands back.
#[derive(Debug, Clone)]
pub enum NativeValue {
    /// No value (void or null).
    Unit,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A list of strings; the only value that satisfies `Enumerable`.
    List(Vec<String>),
    /// A complete result, returned as is when its kind was requested.
    Result(CommandResult),
}

impl NativeValue {
    /// Text form used for the `String` kind. `None` for values without text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            NativeValue::Unit => None,
            NativeValue::String(s) => Some(s.clone()),
            NativeValue::Int(n) => Some(n.to_string()),
            NativeValue::Float(n) => Some(n.to_string()),
            NativeValue::Bool(b) => Some(b.to_string()),
            NativeValue::List(items) => Some(items.join(" ")),
            NativeValue::Result(result) => result.as_str().map(str::to_string),
        }
    }
}

impl From<()> for NativeValue {
    fn from(_: ()) -> Self {
        NativeValue::Unit
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<Option<String>> for NativeValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(NativeValue::Unit, NativeValue::String)
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Int(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Float(value)
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Bool(value)
    }
}

impl From<Vec<String>> for NativeValue {
    fn from(value: Vec<String>) -> Self {
        NativeValue::List(value)
    }
}

impl From<CommandResult> for NativeValue {
    fn from(value: CommandResult) -> Self {
        NativeValue::Result(value)
    }
}

/// A native function with typed formal parameters.
///
/// Cloning is cheap; clones share the native body.
#[derive(Clone)]
pub struct FunctionCommand {
    name: Arc<str>,
    params: Arc<[Param]>,
    required: usize,
    native: NativeFn,
}

/// Outcome of binding call arguments to the formals.
struct Binding {
    params: Params,
    consumed: usize,
}

impl FunctionCommand {
    /// Create a function. Every positional parameter is required.
    ///
    /// # Panics
    ///
    /// If an `ArrayTail` is followed by another positional parameter.
    pub fn new<F>(name: impl Into<Arc<str>>, params: impl Into<Arc<[Param]>>, native: F) -> Self
    where
        F: Fn(&mut ExecContext, &Params) -> anyhow::Result<NativeValue> + Send + Sync + 'static,
    {
        let name = name.into();
        let params = params.into();
        let positional: Vec<Param> = params.iter().copied().filter(|p| p.is_positional()).collect();
        if let Some(tail) = positional.iter().position(|p| *p == Param::ArrayTail) {
            assert!(
                tail + 1 == positional.len(),
                "function {name}: ArrayTail must be the last positional parameter"
            );
        }
        Self {
            required: positional.len(),
            name,
            params,
            native: Arc::new(native),
        }
    }

    /// Lower the number of required positional arguments.
    ///
    /// # Panics
    ///
    /// If `required` exceeds the number of positional parameters.
    pub fn with_required(mut self, required: usize) -> Self {
        assert!(
            required <= self.positional_count(),
            "function {}: {required} required arguments but only {} positional parameters",
            self.name,
            self.positional_count()
        );
        self.required = required;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn required(&self) -> usize {
        self.required
    }

    /// Number of parameters that consume positional arguments.
    pub fn positional_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_positional()).count()
    }

    pub fn has_array_tail(&self) -> bool {
        self.params.contains(&Param::ArrayTail)
    }

    /// Types of the positional parameters; an array tail counts as `string`.
    pub fn positional_types(&self) -> Vec<ParamType> {
        self.params
            .iter()
            .filter_map(|p| match p {
                Param::Plain(ty) => Some(*ty),
                Param::ArrayTail => Some(ParamType::String),
                _ => None,
            })
            .collect()
    }

    fn bind(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<Binding, CommandError> {
        let mut values = Vec::with_capacity(self.params.len());
        let mut consumed = 0;
        for param in self.params.iter() {
            let bound = match param {
                Param::Context => Bound::Context,
                Param::ArgsTail => Bound::Arguments(args.to_vec()),
                Param::KindsTail => Bound::Kinds(kinds.to_vec()),
                Param::ArrayTail => {
                    let rest = &args[consumed.min(args.len())..];
                    let items = rest
                        .iter()
                        .map(|arg| arg.execute_string(ctx))
                        .collect::<Result<Vec<_>, _>>()?;
                    consumed += items.len();
                    Bound::Array(items)
                }
                Param::Plain(ty) => match args.get(consumed) {
                    Some(arg) => {
                        let text = arg.execute_string(ctx)?;
                        consumed += 1;
                        coerce(&text, *ty)?
                    }
                    None => absent(*ty),
                },
            };
            values.push(bound);
        }
        Ok(Binding {
            params: Params::new(values),
            consumed,
        })
    }

    /// Run the native body, unwrapping one level of error.
    fn invoke(&self, ctx: &mut ExecContext, params: &Params) -> Result<NativeValue, CommandError> {
        (self.native)(ctx, params).map_err(|err| match err.downcast::<CommandError>() {
            Ok(err) => err,
            Err(other) => CommandError::Native(format!("{other:#}")),
        })
    }

    fn curry(&self, args: &[CommandRef]) -> CommandRef {
        let this: CommandRef = Arc::new(self.clone());
        if args.is_empty() {
            this
        } else {
            Arc::new(AppliedCommand::new(this, args.to_vec()))
        }
    }
}

/// Coerce an argument string to a parameter type.
fn coerce(text: &str, ty: ParamType) -> Result<Bound, CommandError> {
    let type_error = || CommandError::TypeCoercion {
        value: text.to_string(),
        target: ty.to_string(),
    };
    match ty {
        ParamType::String | ParamType::Other(_) => Ok(Bound::Str(Some(text.to_string()))),
        ParamType::Int => match text.trim().parse::<i64>() {
            Ok(n) => Ok(Bound::Int(Some(n))),
            Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Err(CommandError::NumberTooBig {
                    value: text.to_string(),
                })
            }
            Err(_) => Err(type_error()),
        },
        ParamType::Float => text
            .trim()
            .parse::<f32>()
            .map(|n| Bound::Float(Some(f64::from(n))))
            .map_err(|_| type_error()),
        ParamType::Double => text
            .trim()
            .parse::<f64>()
            .map(|n| Bound::Float(Some(n)))
            .map_err(|_| type_error()),
    }
}

fn absent(ty: ParamType) -> Bound {
    match ty {
        ParamType::Int => Bound::Int(None),
        ParamType::Float | ParamType::Double => Bound::Float(None),
        ParamType::String | ParamType::Other(_) => Bound::Str(None),
    }
}

impl Command for FunctionCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let args = LazyCommand::wrap_all(args);
        let binding = self.bind(ctx, &args, kinds)?;
        let positional = self.positional_count();

        if binding.consumed < positional.min(self.required) {
            if kinds.contains(&ResultKind::Command) {
                return Ok(CommandResult::Command(self.curry(&args)));
            }
            return Err(CommandError::arity(format!(
                "not enough arguments for function {}",
                self.name
            )));
        }

        let curryable = self.has_array_tail() || binding.consumed < positional;
        let mut value: Option<NativeValue> = None;
        for kind in kinds {
            if *kind == ResultKind::Command {
                if value.is_none() && curryable {
                    return Ok(CommandResult::Command(self.curry(&args)));
                }
                continue;
            }

            if value.is_none() {
                value = Some(self.invoke(ctx, &binding.params)?);
            }
            let Some(current) = &value else {
                continue;
            };
            if let NativeValue::Result(result) = current {
                return result.clone().require(kinds, &self.name);
            }
            match kind {
                ResultKind::Empty => return Ok(CommandResult::Empty),
                ResultKind::String => {
                    if let Some(text) = current.to_text().filter(|t| !t.is_empty()) {
                        return Ok(CommandResult::String(text));
                    }
                }
                ResultKind::Enumerable => {
                    if let NativeValue::List(items) = current {
                        return Ok(CommandResult::Enumerable(items.clone()));
                    }
                }
                ResultKind::Command | ResultKind::Extension(_) => {}
            }
        }

        if value.is_some() && kinds.contains(&ResultKind::String) {
            return Ok(CommandResult::String(String::new()));
        }
        Err(CommandError::NoMatchingReturnKind(format!(
            "function {} (wanted {})",
            self.name,
            format_kinds(kinds)
        )))
    }

    fn describe(&self) -> String {
        let types: Vec<String> = self.positional_types().iter().map(|t| t.to_string()).collect();
        format!("{}({})", self.name, types.join(", "))
    }
}

impl fmt::Debug for FunctionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCommand")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("required", &self.required)
            .finish()
    }
}
