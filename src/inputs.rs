use std::collections::HashMap;

/// Crisp input values for one evaluation, keyed by antecedent name.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    // TODO: accept fuzzy facts (a membership vector) alongside crisp values
    pub fn add(&mut self, variable: impl Into<String>, val: f64) -> &mut Self {
        self.0.insert(variable.into(), val);
        self
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
