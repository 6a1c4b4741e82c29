//! JSON problem descriptions for the command-line front end
//!
//! ```json
//! {
//!   "alphabet": [{ "name": "upper", "ranges": [["A", "Z"]] }],
//!   "source": { "states": 1, "initial": 0, "finals": [0], "transitions": [[0, "upper", 0]] },
//!   "target": { "states": 1, "initial": 0, "finals": [0], "transitions": [[0, "upper", 0]] },
//!   "examples": [{ "input": "AB", "output": "AB" }]
//! }
//! ```
//!
//! Transitions name their symbol by minterm. `template` takes an automaton
//! in the same shape; `source_template: true` reuses the source instead.

use crate::error::{SynthError, SynthResult};
use crate::ir::alphabet::{Alphabet, Minterm};
use crate::ir::automaton::Automaton;
use crate::ir::types::{StateId, SymbolId};
use crate::problem::SynthesisProblem;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintermSpec {
    pub name: String,
    /// Inclusive character ranges
    pub ranges: Vec<(char, char)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonSpec {
    pub states: usize,
    #[serde(default)]
    pub initial: StateId,
    pub finals: Vec<StateId>,
    /// `(from, minterm name, to)`
    pub transitions: Vec<(StateId, String, StateId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSpec {
    pub input: String,
    pub output: String,
}

/// A problem as written on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemFile {
    pub alphabet: Vec<MintermSpec>,
    pub source: AutomatonSpec,
    pub target: AutomatonSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<AutomatonSpec>,
    #[serde(default)]
    pub source_template: bool,
    #[serde(default)]
    pub examples: Vec<ExampleSpec>,
}

impl ProblemFile {
    pub fn load(path: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| SynthError::ProblemFile(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(text: &str) -> SynthResult<Self> {
        serde_json::from_str(text).map_err(|e| SynthError::ProblemFile(e.to_string()))
    }

    pub fn to_json(&self) -> SynthResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SynthError::ProblemFile(e.to_string()))
    }

    /// Resolve minterm names and build a validated problem
    pub fn to_problem(&self) -> SynthResult<SynthesisProblem> {
        if self.template.is_some() && self.source_template {
            return Err(SynthError::ProblemFile(
                "`template` and `source_template` are mutually exclusive".to_string(),
            ));
        }

        let minterms = self
            .alphabet
            .iter()
            .map(|m| Minterm::new(m.name.clone(), m.ranges.clone()))
            .collect::<SynthResult<Vec<_>>>()?;
        let alphabet = Alphabet::new(minterms)?;

        let source = build_automaton(&alphabet, &self.source, "source")?;
        let target = build_automaton(&alphabet, &self.target, "target")?;
        let mut problem = SynthesisProblem::new(alphabet, source, target)?;

        if let Some(spec) = &self.template {
            let template = build_automaton(problem.alphabet(), spec, "template")?;
            problem = problem.with_template(&template)?;
        } else if self.source_template {
            problem = problem.with_source_template()?;
        }

        for example in &self.examples {
            problem = problem.with_example(&example.input, &example.output)?;
        }
        Ok(problem)
    }
}

fn build_automaton(alphabet: &Alphabet, spec: &AutomatonSpec, role: &str) -> SynthResult<Automaton> {
    let transitions = spec
        .transitions
        .iter()
        .map(|(from, name, to)| {
            let symbol: SymbolId = alphabet.symbol_named(name).ok_or_else(|| {
                SynthError::InvalidAutomaton(format!("{} uses unknown minterm '{}'", role, name))
            })?;
            Ok((*from, symbol, *to))
        })
        .collect::<SynthResult<Vec<_>>>()?;

    Automaton::from_parts(spec.states, alphabet.len(), spec.initial, &spec.finals, &transitions)
        .map_err(|e| match e {
            SynthError::InvalidAutomaton(reason) => {
                SynthError::InvalidAutomaton(format!("{}: {}", role, reason))
            }
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = r#"{
        "alphabet": [
            { "name": "upper", "ranges": [["A", "Z"]] },
            { "name": "lower", "ranges": [["a", "z"]] }
        ],
        "source": { "states": 1, "initial": 0, "finals": [0],
                    "transitions": [[0, "upper", 0], [0, "lower", 0]] },
        "target": { "states": 1, "finals": [0], "transitions": [[0, "upper", 0]] },
        "examples": [{ "input": "Hi", "output": "H" }]
    }"#;

    #[test]
    fn test_load_problem() {
        let file = ProblemFile::from_json(HELLO).unwrap();
        let problem = file.to_problem().unwrap();
        assert_eq!(problem.alphabet().len(), 2);
        assert_eq!(problem.examples().len(), 1);
        assert!(problem.template().is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let file = ProblemFile::from_json(HELLO).unwrap();
        let again = ProblemFile::from_json(&file.to_json().unwrap()).unwrap();
        assert_eq!(file, again);
    }

    #[test]
    fn test_unknown_minterm() {
        let text = HELLO.replace("[0, \"upper\", 0]]", "[0, \"digit\", 0]]");
        let file = ProblemFile::from_json(&text).unwrap();
        match file.to_problem() {
            Err(SynthError::InvalidAutomaton(reason)) => assert!(reason.contains("digit")),
            other => panic!("expected invalid automaton, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ProblemFile::from_json("{ \"alphabet\": 3 }"),
            Err(SynthError::ProblemFile(_))
        ));
    }

    #[test]
    fn test_source_template_flag() {
        let mut file = ProblemFile::from_json(HELLO).unwrap();
        file.source_template = true;
        let problem = file.to_problem().unwrap();
        assert_eq!(problem.template().map(|t| t.num_states()), Some(1));

        file.template = Some(file.source.clone());
        assert!(file.to_problem().is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem.json");
        std::fs::write(&path, HELLO).unwrap();
        assert!(ProblemFile::load(&path).is_ok());
        assert!(matches!(
            ProblemFile::load(&dir.path().join("missing.json")),
            Err(SynthError::Io(_))
        ));
    }
}
