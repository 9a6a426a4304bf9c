//! Interactive session commands.

use std::path::PathBuf;

use calc_core::{CalcError, CalcResult, ChargerSpec, Parameter};

/// One parsed line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(ChargerSpec),
    /// 1-based schedule position
    Remove(usize),
    Clear,
    List,
    Set(Parameter, f64),
    Params,
    Calc,
    Json,
    Dot(Option<PathBuf>),
    Diagram(PathBuf),
    Report(PathBuf),
    Catalog,
    Help,
    Quit,
}

impl Command {
    /// Commands that change the session and trigger a recompute
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add(_) | Command::Remove(_) | Command::Clear | Command::Set(..)
        )
    }
}

pub const HELP: &str = "\
Commands:
  add <ac|dc>:<kW>[:<qty>[:<1p|3p>]]   add a charger line (also: add dc 150 2)
  remove <n>                           remove line n (see list)
  clear                                remove every charger
  list                                 show the charger schedule
  set <parameter> <value>              change a calculation parameter
  params                               show calculation parameters
  calc                                 show the full sizing result
  json                                 print session and result as JSON
  dot [path]                           print or write the diagram as DOT
  diagram <path.svg|png|pdf>           render the diagram with Graphviz
  report <path.pdf>                    write the PDF sizing report
  catalog                              list typical charger ratings
  help                                 show this help
  quit                                 leave the session";

/// Parse one line. `Ok(None)` for blank lines.
pub fn parse(line: &str) -> CalcResult<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => {
            if args.is_empty() {
                return Err(CalcError::missing_field("charger"));
            }
            Command::Add(args.join(":").parse()?)
        }
        "remove" | "rm" => {
            let position = single_arg(&args, "position")?;
            let n = position
                .parse()
                .map_err(|_| CalcError::invalid_input("position", position, "Position must be a whole number"))?;
            Command::Remove(n)
        }
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "set" => {
            let (name, value) = match args.as_slice() {
                [name, value] => (*name, *value),
                [] | [_] => return Err(CalcError::missing_field("value")),
                _ => return Err(CalcError::invalid_input("set", args.join(" "), "Expected: set <parameter> <value>")),
            };
            let parameter: Parameter = name.parse()?;
            let value: f64 = value
                .parse()
                .map_err(|_| CalcError::invalid_input(parameter.name(), value, "Value must be a number"))?;
            Command::Set(parameter, value)
        }
        "params" => Command::Params,
        "calc" | "results" => Command::Calc,
        "json" => Command::Json,
        "dot" => Command::Dot(args.first().map(PathBuf::from)),
        "diagram" | "sld" => Command::Diagram(PathBuf::from(single_arg(&args, "path")?)),
        "report" | "pdf" => Command::Report(PathBuf::from(single_arg(&args, "path")?)),
        "catalog" => Command::Catalog,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CalcError::invalid_input("command", other, "Unknown command, type help")),
    };
    Ok(Some(command))
}

fn single_arg<'a>(args: &[&'a str], field: &str) -> CalcResult<&'a str> {
    match args {
        [arg] => Ok(arg),
        [] => Err(CalcError::missing_field(field)),
        _ => Err(CalcError::invalid_input(field, args.join(" "), "Expected a single value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::SupplyPhase;
    use pretty_assertions::assert_eq;

    fn parse_ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_add_forms() {
        assert_eq!(parse_ok("add dc:150:2"), Command::Add(ChargerSpec::dc(150.0, 2)));
        assert_eq!(parse_ok("add dc 150 2"), Command::Add(ChargerSpec::dc(150.0, 2)));
        assert_eq!(
            parse_ok("ADD ac 22 1 1p"),
            Command::Add(ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Single))
        );
    }

    #[test]
    fn test_add_rejects_invalid_charger() {
        assert!(parse("add").is_err());
        assert!(parse("add ac:-5").is_err());
        assert!(parse("add dc:50:0").is_err());
    }

    #[test]
    fn test_remove() {
        assert_eq!(parse_ok("remove 2"), Command::Remove(2));
        assert!(parse("remove").is_err());
        assert!(parse("remove two").is_err());
    }

    #[test]
    fn test_set() {
        assert_eq!(parse_ok("set diversity_factor 0.8"), Command::Set(Parameter::DiversityFactor, 0.8));
        assert_eq!(parse_ok("set ac-voltage 415"), Command::Set(Parameter::AcVoltage, 415.0));
        assert!(parse("set diversity_factor").is_err());
        assert!(parse("set diversity_factor lots").is_err());
        assert!(parse("set bogus 1").is_err());
    }

    #[test]
    fn test_outputs_and_control() {
        assert_eq!(parse_ok("dot"), Command::Dot(None));
        assert_eq!(parse_ok("dot sld.dot"), Command::Dot(Some(PathBuf::from("sld.dot"))));
        assert_eq!(parse_ok("diagram out.svg"), Command::Diagram(PathBuf::from("out.svg")));
        assert_eq!(parse_ok("report site.pdf"), Command::Report(PathBuf::from("site.pdf")));
        assert!(parse("diagram").is_err());
        assert_eq!(parse_ok("quit"), Command::Quit);
        assert_eq!(parse_ok("exit"), Command::Quit);
        assert!(parse("frobnicate").is_err());
    }

    #[test]
    fn test_mutating() {
        assert!(parse_ok("clear").is_mutating());
        assert!(parse_ok("set power_factor 0.9").is_mutating());
        assert!(!parse_ok("list").is_mutating());
        assert!(!parse_ok("json").is_mutating());
    }
}
