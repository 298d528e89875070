use std::cmp::Ordering;
use std::sync::Arc;

use chatcmd_types::{CommandError, ResultKind};

use super::{Command, CommandRef, ExecContext, FunctionCommand, LazyCommand, ParamType};
use crate::interpreter::CommandResult;

/// Several functions sharing one name.
///
/// Candidates are kept sorted so the most specific signature is tried first:
/// positional types are compared position by position (`int` before `float`
/// before `double` before `string` before anything else), and when one
/// signature is a prefix of the other the longer one wins.
///
/// The set is immutable; adding or removing a function builds a new one.
#[derive(Clone, Debug)]
pub struct OverloadedFunctionCommand {
    functions: Arc<[FunctionCommand]>,
    help: Option<Arc<str>>,
}

impl OverloadedFunctionCommand {
    pub fn new(mut functions: Vec<FunctionCommand>) -> Self {
        functions.sort_by(|a, b| compare_signatures(&a.positional_types(), &b.positional_types()));
        Self {
            functions: functions.into(),
            help: None,
        }
    }

    /// Attach help text (usually the help of every overload).
    pub fn with_help(mut self, help: impl Into<Arc<str>>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// A new set with `function` added.
    pub fn with_function(&self, function: FunctionCommand) -> Self {
        let mut functions = self.functions.to_vec();
        functions.push(function);
        Self {
            help: self.help.clone(),
            ..Self::new(functions)
        }
    }

    /// Candidates in the order they are tried.
    pub fn functions(&self) -> &[FunctionCommand] {
        &self.functions
    }
}

/// Order two positional signatures, most specific first.
pub(crate) fn compare_signatures(a: &[ParamType], b: &[ParamType]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.rank().cmp(&y.rank()))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| b.len().cmp(&a.len()))
}

impl Command for OverloadedFunctionCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let args = LazyCommand::wrap_all(args);
        for function in self.functions.iter() {
            match function.execute(ctx, &args, kinds) {
                Ok(result) => return Ok(result),
                Err(err @ CommandError::BudgetExhausted(_)) => return Err(err),
                Err(err) => {
                    tracing::debug!(overload = %function.describe(), error = %err, "overload rejected");
                }
            }
        }
        Err(CommandError::NoMatchingOverload)
    }

    fn describe(&self) -> String {
        let overloads: Vec<String> = self.functions.iter().map(|f| f.describe()).collect();
        overloads.join(" | ")
    }

    fn help(&self) -> Option<String> {
        self.help.as_deref().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{NativeValue, Param, StringCommand};

    fn func(tag: &'static str, types: &[ParamType]) -> FunctionCommand {
        let params: Vec<Param> = types.iter().map(|t| Param::Plain(*t)).collect();
        FunctionCommand::new(tag, params, move |_, _| Ok(NativeValue::from(tag)))
    }

    fn lit(text: &str) -> CommandRef {
        Arc::new(StringCommand::new(text))
    }

    #[test]
    fn sorts_most_specific_first() {
        let set = OverloadedFunctionCommand::new(vec![
            func("s", &[ParamType::String]),
            func("i", &[ParamType::Int]),
            func("ii", &[ParamType::Int, ParamType::Int]),
        ]);
        let order: Vec<&str> = set.functions().iter().map(FunctionCommand::name).collect();
        assert_eq!(order, ["ii", "i", "s"]);
    }

    #[test]
    fn unranked_types_sort_last_and_ties_keep_order() {
        let set = OverloadedFunctionCommand::new(vec![
            func("url", &[ParamType::Other("url")]),
            func("a", &[ParamType::String]),
            func("b", &[ParamType::String]),
            func("d", &[ParamType::Double]),
        ]);
        let order: Vec<&str> = set.functions().iter().map(FunctionCommand::name).collect();
        assert_eq!(order, ["d", "a", "b", "url"]);
    }

    #[test]
    fn picks_first_fitting_overload() {
        let set = OverloadedFunctionCommand::new(vec![
            func("STRING", &[ParamType::String]),
            func("INT", &[ParamType::Int]),
        ]);
        let mut ctx = ExecContext::new();
        let result = set.execute(&mut ctx, &[lit("1")], ResultKind::STRING).unwrap();
        assert_eq!(result.as_str(), Some("INT"));
        let result = set.execute(&mut ctx, &[lit("a")], ResultKind::STRING).unwrap();
        assert_eq!(result.as_str(), Some("STRING"));
    }

    #[test]
    fn no_fitting_overload() {
        let set = OverloadedFunctionCommand::new(vec![
            func("STRING", &[ParamType::String]),
            func("INT", &[ParamType::Int]),
        ]);
        let mut ctx = ExecContext::new();
        let err = set.execute(&mut ctx, &[], ResultKind::STRING).unwrap_err();
        assert_eq!(err, CommandError::NoMatchingOverload);
    }

    #[test]
    fn with_function_resorts() {
        let set = OverloadedFunctionCommand::new(vec![func("s", &[ParamType::String])])
            .with_function(func("i", &[ParamType::Int]));
        assert_eq!(set.functions()[0].name(), "i");
    }
}
