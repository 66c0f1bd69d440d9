//! Snippet tests for the finch pipeline as a whole.

use std::{
    fs,
    path::PathBuf,
    collections::HashMap,
    rc::Rc,
};

use finch::{
    common::{
        source::Source,
        data::Data,
    },
    compiler::{lex, read},
    Error,
    VM,
};

/// Represents specific success/failure modes of a snippet test.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Syntax,
    Trace,
}

impl Outcome {
    pub fn parse(outcome: &str) -> Outcome {
        match outcome {
            "success" => Outcome::Success,
            "syntax"  => Outcome::Syntax,
            "trace"   => Outcome::Trace,
            invalid => panic!("invalid outcome '{}' in strat heading", invalid),
        }
    }
}

/// Represents what part of the pipeline a snippet tests.
#[derive(Debug)]
pub enum Action {
    Lex,
    Read,
    Run,
}

impl Action {
    pub fn parse(action: &str) -> Action {
        match action {
            "lex"  => Action::Lex,
            "read" => Action::Read,
            "run"  => Action::Run,
            invalid => panic!("invalid action '{}' in strat heading", invalid),
        }
    }
}

/// Represents a test strategy for executing a snippet,
/// found at the top of each file.
#[derive(Debug)]
pub struct TestStrat {
    /// How to run the test.
    action:  Action,
    /// The expected outcome.
    outcome: Outcome,
    /// Optional data to check the last value against.
    /// Should only be used with Action::Run
    expect:  Option<Data>,
}

impl TestStrat {
    /// Uses a heading to construct a test strat
    pub fn heading(heading: HashMap<String, String>) -> TestStrat {
        let mut outcome = None;
        let mut action = None;
        let mut expect = None;

        for (strat, result) in heading.iter() {
            match strat.as_str() {
                "outcome" => outcome = Some(Outcome::parse(result)),
                "action"  => action  = Some(Action::parse(result)),
                "expect"  => {
                    let mut forms = finch::read(result).expect("Could not read expectation");
                    assert_eq!(forms.len(), 1, "expected exactly one form as the expectation");
                    expect = Some(forms.remove(0));
                },
                invalid => panic!("invalid strat '{}' in strat heading", invalid),
            }
        }

        TestStrat {
            outcome: outcome.expect("no outcome provided"),
            action: action.expect("no action provided"),
            expect,
        }
    }

    /// Parses the Test Strat from a given snippet.
    /// The heading is the run of `;` comment lines at the top of the file.
    pub fn snippet(source: &Rc<Source>) -> TestStrat {
        let mut heading = HashMap::new();

        for line in source.contents.lines() {
            let line = match line.strip_prefix(';') {
                Some(rest) => rest.trim_start_matches(';'),
                None => break,
            };

            let (strat, result) = line.split_once(':')
                .expect("Missing colon in test strat heading");

            if heading.insert(strat.trim().to_string(), result.trim().to_string()).is_some() {
                panic!("Key present twice in test strat heading");
            }
        }

        TestStrat::heading(heading)
    }
}

/// Evaluates every form in a fresh VM, returning the last value.
fn run(source: Rc<Source>) -> Result<Data, Error> {
    let forms = read(source)?;
    let mut vm = VM::init()?;
    let mut last = Data::Nil;

    for form in forms.iter() {
        last = vm.eval(form)?;
    }

    Ok(last)
}

fn test_snippet(source: Rc<Source>, strat: TestStrat) {
    let actual_outcome: Outcome = match strat.action {
        Action::Lex => if lex(source)
            .is_ok() { Outcome::Success } else { Outcome::Syntax },

        Action::Read => if read(source)
            .is_ok() { Outcome::Success } else { Outcome::Syntax },

        Action::Run => match run(source) {
            Ok(last) => {
                if let Some(expected) = &strat.expect {
                    // printed forms tell apart values equality lets through, like -0 and 0
                    if expected != &last || expected.to_string() != last.to_string() {
                        println!("Last: {}", last);
                        println!("Expected: {}", expected);
                        panic!("Last value does not match")
                    }
                }
                Outcome::Success
            },
            Err(Error::Syntax(e)) => { println!("{}", e); Outcome::Syntax },
            Err(Error::Trace(e))  => { println!("{}", e); Outcome::Trace },
        },
    };

    if actual_outcome != strat.outcome {
        println!("expected outcome {:?}", strat.outcome);
        println!("actual outcome {:?}", actual_outcome);
        panic!("test failed, outcomes are not the same");
    }
}

#[test]
fn test_snippets() {
    let paths = fs::read_dir("./tests/snippets")
        .expect("You must be in the base finch directory, snippets in ./tests/snippets");

    let mut to_run: Vec<PathBuf> = vec![];
    for path in paths { to_run.push(path.expect("Could not read path").path()) }
    to_run.sort();

    println!("\nRunning {} snippet test(s)...", to_run.len());

    for (counter, path) in to_run.iter().enumerate() {
        println!("test {}: {}...", counter, path.display());

        let contents = fs::read_to_string(path).expect("Could not read snippet");
        let source = Source::new(&contents, path);
        let test_strat = TestStrat::snippet(&source);

        test_snippet(source, test_strat);
    }

    println!("All tests passed!\n");
}
