use serde::{Deserialize, Serialize};

/// A rule premise over `(variable, term)` propositions, referenced by name.
///
/// ```
/// use fuzzy_health_risk::Premise;
///
/// let premise = Premise::is("imc", "normal")
///     .and(Premise::is("edad", "joven").or(Premise::is("edad", "adulto")));
/// assert_eq!(premise.propositions().len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Premise {
    Is { variable: String, term: String },
    And(Vec<Premise>),
    Or(Vec<Premise>),
}

impl Premise {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Premise::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, rhs: Premise) -> Self {
        match self {
            Premise::And(mut exprs) => {
                exprs.push(rhs);
                Premise::And(exprs)
            },
            lhs => Premise::And(vec![lhs, rhs]),
        }
    }

    pub fn or(self, rhs: Premise) -> Self {
        match self {
            Premise::Or(mut exprs) => {
                exprs.push(rhs);
                Premise::Or(exprs)
            },
            lhs => Premise::Or(vec![lhs, rhs]),
        }
    }

    pub fn propositions(&self) -> Vec<(&str, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Premise, out: &mut Vec<(&'p str, &'p str)>) {
            match expr {
                Premise::Is { variable, term } => out.push((variable.as_str(), term.as_str())),
                Premise::And(exprs) | Premise::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }
}

#[test]
fn test_builder_flattens_chains() {
    let premise = Premise::is("imc", "sobrepeso")
        .and(Premise::is("edad", "adulto"))
        .and(Premise::is("edad", "mayor"));

    assert!(matches!(&premise, Premise::And(exprs) if exprs.len() == 3));

    // a nested group stays nested
    let premise = Premise::is("imc", "normal").and(Premise::is("edad", "joven").or(Premise::is("edad", "adulto")));

    match &premise {
        Premise::And(exprs) => assert!(matches!(&exprs[1], Premise::Or(inner) if inner.len() == 2)),
        other => panic!("unexpected premise {other:?}"),
    }
}

#[test]
fn test_serde_shape() {
    let premise = Premise::is("imc", "bajo").and(Premise::is("edad", "mayor"));
    let json = serde_json::to_string(&premise).unwrap();

    assert_eq!(
        json,
        r#"{"and":[{"is":{"variable":"imc","term":"bajo"}},{"is":{"variable":"edad","term":"mayor"}}]}"#
    );
    assert_eq!(serde_json::from_str::<Premise>(&json).unwrap(), premise);
}
