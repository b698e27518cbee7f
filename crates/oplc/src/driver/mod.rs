//! Checking driver: source -> tokens -> AST -> verdict

use crate::common::CompileResult;
use crate::frontend::{Lexer, Parser, Program};
use crate::sema;
use log::debug;

/// Verdict printed when a program passes every check
pub const PASSED: &str = "Static checking passed";

/// Pipeline switches
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Dump tokens to stderr
    pub dump_tokens: bool,
    /// Dump the AST to stderr
    pub dump_ast: bool,
    /// Announce each phase on stderr
    pub verbose: bool,
}

/// Lex and parse `source`, honouring the dump switches
pub fn parse_source(source: &str, config: &CheckConfig) -> CompileResult<Program> {
    if config.verbose {
        eprintln!("Lexing...");
    }
    debug!("lexing {} bytes", source.len());
    let tokens = Lexer::new(source).tokenize_all()?;

    if config.dump_tokens {
        eprintln!("=== OPLang Tokens ===");
        for token in &tokens {
            eprintln!("{:?}", token);
        }
        eprintln!("=== End Tokens ===\n");
    }

    if config.verbose {
        eprintln!("Parsing...");
    }
    debug!("parsing {} tokens", tokens.len());
    let program = Parser::from_tokens(tokens).parse()?;

    if config.dump_ast {
        eprintln!("=== OPLang AST ===");
        eprintln!("{:#?}", program);
        eprintln!("=== End AST ===\n");
    }

    Ok(program)
}

/// Run the whole pipeline over one source text
pub fn check_source(source: &str, config: &CheckConfig) -> CompileResult<()> {
    let program = parse_source(source, config)?;
    if config.verbose {
        eprintln!("Checking...");
    }
    debug!("checking {} classes", program.classes.len());
    sema::check(&program)?;
    Ok(())
}

/// One-line verdict for a pipeline result
///
/// Semantic violations render as `Kind(payload)`; lexer, parser and I/O
/// failures render through their own messages.
pub fn verdict(result: &CompileResult<()>) -> String {
    match result {
        Ok(()) => PASSED.to_string(),
        Err(err) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CompileError;
    use crate::sema::StaticError;
    use pretty_assertions::assert_eq;

    const PROGRAM: &str = r#"
        # Running sum of the first ten integers
        class Sum {
            static int total;

            static void main() {
                for i := 1 to 10 do {
                    Sum.total := Sum.total + i;
                }
                io.writeIntLn(Sum.total);
            }
        }
    "#;

    #[test]
    fn test_passing_program() {
        let result = check_source(PROGRAM, &CheckConfig::default());
        assert!(result.is_ok());
        assert_eq!(verdict(&result), PASSED);
    }

    #[test]
    fn test_static_violation_verdict() {
        let source = "class T { static void main() { int x := true; } }";
        let result = check_source(source, &CheckConfig::default());
        assert!(matches!(
            result,
            Err(CompileError::Static(StaticError::TypeMismatchInStatement { .. }))
        ));
        assert_eq!(verdict(&result), "TypeMismatchInStatement(int x:=true)");
    }

    #[test]
    fn test_missing_entry_point_verdict() {
        let result = check_source("class A {}", &CheckConfig::default());
        assert_eq!(verdict(&result), "No Entry Point");
    }

    #[test]
    fn test_lexer_error_is_not_a_verdict() {
        let result = check_source("class T { int x := 1 @ 2; }", &CheckConfig::default());
        assert!(matches!(result, Err(CompileError::Lexer { .. })));
    }

    #[test]
    fn test_parser_error_is_not_a_verdict() {
        let source = "class T { static void main() { int x := ; } }";
        let result = check_source(source, &CheckConfig::default());
        assert!(matches!(result, Err(CompileError::Parser { .. })));
    }

    #[test]
    fn test_verbose_keeps_the_verdict() {
        let config = CheckConfig {
            verbose: true,
            ..CheckConfig::default()
        };
        assert_eq!(verdict(&check_source(PROGRAM, &config)), PASSED);
        let source = "class T { static void main() { break; } }";
        assert_eq!(verdict(&check_source(source, &config)), "MustInLoop(break)");
    }

    #[test]
    fn test_dumps_do_not_change_the_verdict() {
        let config = CheckConfig {
            dump_tokens: true,
            dump_ast: true,
            verbose: true,
        };
        assert_eq!(verdict(&check_source(PROGRAM, &config)), PASSED);
    }

    #[test]
    fn test_parse_source() {
        let program = parse_source(PROGRAM, &CheckConfig::default()).unwrap();
        assert_eq!(program.classes.len(), 1);
        assert_eq!(program.classes[0].name, "Sum");
    }
}
