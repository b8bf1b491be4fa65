use std::env;
use std::io::{self, BufRead};
use std::process::exit;
use tabsweep_matcher::{CaseMatching, FuzzyMatcher, IndexType, TabSweepMatcher};
use termion::style::{Invert, Reset};

pub fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // arg parsing (manually)
    let mut arg_iter = args.iter().skip(1);
    let mut pattern = "".to_string();
    let mut case = CaseMatching::Ignore;

    while let Some(arg) = arg_iter.next() {
        if arg == "--case" {
            let mode = arg_iter.next().map(String::as_str).unwrap_or("");
            case = match mode.parse::<CaseMatching>() {
                Ok(case) => case,
                Err(err) => {
                    eprintln!("{}", err);
                    exit(1);
                }
            };
        } else {
            pattern = arg.to_string();
        }
    }

    if pattern.is_empty() {
        eprintln!("Usage: echo <piped_input> | fz --case [ignore|respect|smart] <pattern>");
        exit(1);
    }

    let matcher = TabSweepMatcher::default().case_matching(case);

    let stdin = io::stdin();
    let mut ranked = Vec::new();
    for line in stdin.lock().lines().map_while(Result::ok) {
        if let Some((score, indices)) = matcher.fuzzy_indices(&line, &pattern) {
            ranked.push((score, wrap_matches(&line, &indices)));
        }
    }

    ranked.sort_by_key(|(score, _)| -score);
    for (score, line) in ranked {
        println!("{:8}: {}", score, line);
    }
}

fn wrap_matches(line: &str, indices: &[IndexType]) -> String {
    let mut ret = String::new();
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        if peekable.peek().map_or(false, |&&next_id| next_id == idx as IndexType) {
            ret.push_str(format!("{}{}{}", Invert, ch, Reset).as_str());
            peekable.next();
        } else {
            ret.push(ch);
        }
    }

    ret
}
