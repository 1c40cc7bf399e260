use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::iter::Peekable;

use bab_core::model::Comparison;
use bab_core::model::IntegerProgram;
use bab_core::model::LinearConstraint;
use bab_core::model::LinearExpression;
use bab_core::model::OptimisationDirection;
use bab_core::model::VariableDefinition;
use bab_core::model::VariableKind;
use bab_core::ConstraintOperationError;
use fnv::FnvHashMap;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LpFormatError {
    #[error("failed to read the program")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("the program has no objective")]
    MissingObjective,
    #[error("line {line}: the objective was already given on line {first}")]
    DuplicateObjective { line: usize, first: usize },
    #[error("invalid program: {0}")]
    Model(#[from] ConstraintOperationError),
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Times,
    Comparison(Comparison),
}

#[derive(Clone, Debug, PartialEq)]
struct Term {
    coefficient: f64,
    variable: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Declaration {
    Integer,
    Binary,
    Free,
}

#[derive(Clone, Debug, PartialEq)]
enum Statement {
    Objective {
        direction: OptimisationDirection,
        terms: Vec<Term>,
    },
    Constraint {
        lhs: Vec<Term>,
        comparison: Comparison,
        rhs: Vec<Term>,
    },
    Declaration {
        declaration: Declaration,
        names: Vec<String>,
    },
}

impl Statement {
    fn variables(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Statement::Objective { terms, .. } => Box::new(variables_of(terms)),
            Statement::Constraint { lhs, rhs, .. } => {
                Box::new(variables_of(lhs).chain(variables_of(rhs)))
            }
            Statement::Declaration { names, .. } => Box::new(names.iter().map(String::as_str)),
        }
    }
}

fn variables_of(terms: &[Term]) -> impl Iterator<Item = &str> + '_ {
    terms.iter().filter_map(|term| term.variable.as_deref())
}

/// Reads an integer program from a line-based text format:
///
/// ```text
/// # comments start with a '#'
/// max: 3 x + 2 y          # or 'min:'; exactly one objective
/// c1: x + y <= 4          # an optional label, then '<=', '>=' or '=' between two expressions
/// x <= 1.5
/// int x, y                # integer variables ('int' or 'integer')
/// bin z                   # binary variables
/// free w                  # variables without the default lower bound of 0
/// ```
///
/// Variables are continuous and non-negative unless declared otherwise, and are created in the
/// order in which they first appear.
pub fn parse_lp_format(source: impl Read) -> Result<IntegerProgram, LpFormatError> {
    let reader = BufReader::new(source);

    let mut statements = vec![];
    let mut objective_line = None;
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let Some(statement) = parse_line(&line).map_err(|message| LpFormatError::Syntax {
            line: line_number,
            message,
        })?
        else {
            continue;
        };

        if matches!(statement, Statement::Objective { .. }) {
            if let Some(first) = objective_line {
                return Err(LpFormatError::DuplicateObjective {
                    line: line_number,
                    first,
                });
            }
            objective_line = Some(line_number);
        }
        statements.push(statement);
    }

    if objective_line.is_none() {
        return Err(LpFormatError::MissingObjective);
    }

    build_program(&statements)
}

fn build_program(statements: &[Statement]) -> Result<IntegerProgram, LpFormatError> {
    let mut names: Vec<&str> = vec![];
    let mut declarations: FnvHashMap<&str, Vec<Declaration>> = FnvHashMap::default();
    for statement in statements {
        for name in statement.variables() {
            if !declarations.contains_key(name) {
                let _ = declarations.insert(name, vec![]);
                names.push(name);
            }
        }
        if let Statement::Declaration {
            declaration,
            names: declared,
        } = statement
        {
            for name in declared {
                if let Some(list) = declarations.get_mut(name.as_str()) {
                    list.push(*declaration);
                }
            }
        }
    }

    let mut program = IntegerProgram::new();
    let mut variables = FnvHashMap::default();
    for name in names {
        let declared = declarations.get(name).map(Vec::as_slice).unwrap_or_default();
        let is_binary = declared.contains(&Declaration::Binary);
        let is_integer = is_binary || declared.contains(&Declaration::Integer);
        let is_free = declared.contains(&Declaration::Free);

        let variable = program.new_variable(VariableDefinition::new(
            name,
            (!is_free).then_some(0.0),
            is_binary.then_some(1.0),
            if is_integer {
                VariableKind::Integer
            } else {
                VariableKind::Continuous
            },
        ));
        let _ = variables.insert(name, variable);
    }

    let expression = |terms: &[Term]| -> LinearExpression {
        terms
            .iter()
            .map(|term| match &term.variable {
                Some(name) => match variables.get(name.as_str()) {
                    Some(&variable) => {
                        LinearExpression::new().with_term(variable, term.coefficient)
                    }
                    None => LinearExpression::new(),
                },
                None => LinearExpression::constant(term.coefficient),
            })
            .sum()
    };

    for statement in statements {
        match statement {
            Statement::Objective { direction, terms } => {
                program.set_objective(*direction, expression(terms))?;
            }
            Statement::Constraint {
                lhs,
                comparison,
                rhs,
            } => {
                let (lhs, rhs) = (expression(lhs), expression(rhs));
                let constraint = match comparison {
                    Comparison::LessThanOrEquals => LinearConstraint::less_than_or_equals(lhs, rhs),
                    Comparison::GreaterThanOrEquals => {
                        LinearConstraint::greater_than_or_equals(lhs, rhs)
                    }
                    Comparison::Equals => LinearConstraint::equals(lhs, rhs),
                };
                program.add_constraint(constraint)?;
            }
            Statement::Declaration { .. } => {}
        }
    }

    debug!(
        "Parsed a program with {} variables and {} constraints",
        program.num_variables(),
        program.constraints().len()
    );
    Ok(program)
}

fn parse_line(line: &str) -> Result<Option<Statement>, String> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = content
        .split_once(char::is_whitespace)
        .unwrap_or((content, ""));
    let declaration = match keyword {
        "int" | "integer" => Some(Declaration::Integer),
        "bin" | "binary" => Some(Declaration::Binary),
        "free" => Some(Declaration::Free),
        _ => None,
    };
    if let Some(declaration) = declaration {
        let names = rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(|name| {
                if is_identifier(name) {
                    Ok(name.to_owned())
                } else {
                    Err(format!("'{name}' is not a variable name"))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        if names.is_empty() {
            return Err(format!("'{keyword}' declares no variables"));
        }

        return Ok(Some(Statement::Declaration { declaration, names }));
    }

    let (label, body) = match content.split_once(':') {
        Some((label, body)) => (Some(label.trim()), body),
        None => (None, content),
    };

    let direction = match label.map(str::to_ascii_lowercase).as_deref() {
        Some("max" | "maximise" | "maximize") => Some(OptimisationDirection::Maximise),
        Some("min" | "minimise" | "minimize") => Some(OptimisationDirection::Minimise),
        _ => None,
    };
    if let Some(direction) = direction {
        let mut tokens = tokenize(body)?.into_iter().peekable();
        let terms = parse_expression(&mut tokens)?;
        if let Some(token) = tokens.next() {
            return Err(format!("unexpected {token:?} in the objective"));
        }
        return Ok(Some(Statement::Objective { direction, terms }));
    }

    if let Some(label) = label {
        if !is_identifier(label) {
            return Err(format!("'{label}' is not a valid constraint label"));
        }
    }

    let tokens = tokenize(body)?;
    let mut comparisons = tokens
        .iter()
        .enumerate()
        .filter_map(|(position, token)| match token {
            Token::Comparison(comparison) => Some((position, *comparison)),
            _ => None,
        });
    let Some((position, comparison)) = comparisons.next() else {
        return Err("a constraint needs one of '<=', '>=' or '='".to_owned());
    };
    if comparisons.next().is_some() {
        return Err("a constraint can only have one comparison".to_owned());
    }

    let mut lhs_tokens = tokens[..position].iter().cloned().peekable();
    let mut rhs_tokens = tokens[position + 1..].iter().cloned().peekable();
    let lhs = parse_expression(&mut lhs_tokens)?;
    let rhs = parse_expression(&mut rhs_tokens)?;
    if let Some(token) = lhs_tokens.next().or_else(|| rhs_tokens.next()) {
        return Err(format!("unexpected {token:?} in the constraint"));
    }

    Ok(Some(Statement::Constraint {
        lhs,
        comparison,
        rhs,
    }))
}

/// Parses `[+|-] term ([+|-] term)*`, where a term is a number, a variable, or a number followed by
/// an optional `*` and a variable. Stops at the first token which cannot continue the expression.
fn parse_expression(
    tokens: &mut Peekable<impl Iterator<Item = Token>>,
) -> Result<Vec<Term>, String> {
    let mut terms = vec![];

    loop {
        let mut sign = 1.0;
        while let Some(token) =
            tokens.next_if(|token| matches!(token, Token::Plus | Token::Minus))
        {
            if token == Token::Minus {
                sign = -sign;
            }
        }

        let term = match tokens.next() {
            Some(Token::Number(coefficient)) => {
                let _ = tokens.next_if_eq(&Token::Times);
                let variable = match tokens.next_if(|token| matches!(token, Token::Name(_))) {
                    Some(Token::Name(name)) => Some(name),
                    _ => None,
                };
                Term {
                    coefficient: sign * coefficient,
                    variable,
                }
            }
            Some(Token::Name(name)) => Term {
                coefficient: sign,
                variable: Some(name),
            },
            Some(token) => return Err(format!("expected a term but found {token:?}")),
            None => return Err("expected a term".to_owned()),
        };
        terms.push(term);

        if !matches!(tokens.peek(), Some(Token::Plus | Token::Minus)) {
            return Ok(terms);
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Times,
            '<' | '>' => {
                if chars.next_if(|&(_, next)| next == '=').is_none() {
                    return Err(format!("expected '{c}=' instead of '{c}'"));
                }
                if c == '<' {
                    Token::Comparison(Comparison::LessThanOrEquals)
                } else {
                    Token::Comparison(Comparison::GreaterThanOrEquals)
                }
            }
            '=' => {
                let _ = chars.next_if(|&(_, next)| next == '=');
                Token::Comparison(Comparison::Equals)
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                let mut previous = c;
                while let Some(&(position, next)) = chars.peek() {
                    let continues_number = next.is_ascii_digit()
                        || next == '.'
                        || next == 'e'
                        || next == 'E'
                        || ((next == '+' || next == '-') && (previous == 'e' || previous == 'E'));
                    if !continues_number {
                        break;
                    }
                    end = position + next.len_utf8();
                    previous = next;
                    let _ = chars.next();
                }

                let number = &text[start..end];
                Token::Number(
                    number
                        .parse()
                        .map_err(|_| format!("'{number}' is not a number"))?,
                )
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(position, next)) = chars.peek() {
                    if !is_identifier_char(next) {
                        break;
                    }
                    end = position + next.len_utf8();
                    let _ = chars.next();
                }
                Token::Name(text[start..end].to_owned())
            }
            c => return Err(format!("unexpected character '{c}'")),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '[' | ']' | '.')
}

fn is_identifier(name: &str) -> bool {
    name.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && name.chars().all(is_identifier_char)
}
