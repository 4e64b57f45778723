//! Walks a config object graph into a flat sequence of leaf triples and
//! assigns such a sequence back onto an empty target of the same shape.
//!
//! Serialization is a pure read of the source object; deserialization is a
//! pure mutation of the target. Shape discovery goes through the
//! `ConfigBlock`/`FormBlock` contracts, not a schema baked in here.

use crate::error::MalformedConfigError;
use crate::shape::{InputSpec, InputValue};
use crate::{ConfigBlock, FormBlock};

/// One flattened leaf: which form it belongs to, its descriptor, and the
/// current value (`None` for a null leaf).
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub form: &'static str,
    pub input: InputSpec,
    pub value: Option<InputValue>,
}

/// Returns a lazy iterator over every declared leaf of `config`, in
/// declaration order. Restartable: call again for a fresh pass.
pub fn leaves(config: &dyn ConfigBlock) -> Leaves<'_> {
    Leaves {
        forms: config.forms(),
        form: 0,
        input: 0,
    }
}

/// Iterator returned by [`leaves`]. A form that declares no inputs yields
/// a single `MalformedConfigError::EmptyForm` in its place.
pub struct Leaves<'a> {
    forms: Vec<(&'static str, &'a dyn FormBlock)>,
    form: usize,
    input: usize,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = Result<Leaf, MalformedConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (name, form) = *self.forms.get(self.form)?;
            let specs = form.inputs();

            if specs.is_empty() {
                self.form += 1;
                self.input = 0;
                return Some(Err(MalformedConfigError::EmptyForm {
                    form: name.to_string(),
                }));
            }

            match specs.get(self.input) {
                Some(spec) => {
                    self.input += 1;
                    return Some(form.input_value(spec.name).map(|value| Leaf {
                        form: name,
                        input: *spec,
                        value,
                    }));
                }
                None => {
                    self.form += 1;
                    self.input = 0;
                }
            }
        }
    }
}

/// Assigns each leaf back onto `target` by (form, input) path. Declared
/// leaves missing from the sequence keep their default (`None`); a leaf
/// naming an undeclared form or input is an error.
pub fn absorb(
    target: &mut dyn ConfigBlock,
    leaves: impl IntoIterator<Item = Leaf>,
) -> Result<(), MalformedConfigError> {
    let mut forms = target.forms_mut();
    for leaf in leaves {
        let form = forms
            .iter_mut()
            .find(|(name, _)| *name == leaf.form)
            .map(|(_, form)| form)
            .ok_or_else(|| MalformedConfigError::UnknownForm {
                form: leaf.form.to_string(),
            })?;
        form.set_input(leaf.input.name, leaf.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedConfigError;
    use crate::shape::{InputKind, InputSpec, InputValue};
    use crate::{ConfigBlock, FormBlock};

    #[derive(FormBlock, Debug, Default, PartialEq)]
    struct LinkForm {
        host: Option<String>,
        port: Option<i64>,
        #[sensitive]
        password: Option<String>,
    }

    #[derive(FormBlock, Debug, Default, PartialEq)]
    struct ThrottlingForm {
        extractors: Option<i64>,
        compress: Option<bool>,
    }

    #[derive(ConfigBlock, Debug, Default, PartialEq)]
    struct JobConfig {
        link: LinkForm,
        throttling: ThrottlingForm,
    }

    fn sample() -> JobConfig {
        JobConfig {
            link: LinkForm {
                host: Some("db.example.com".to_string()),
                port: Some(5432),
                password: Some("hunter2".to_string()),
            },
            throttling: ThrottlingForm {
                extractors: Some(4),
                compress: None,
            },
        }
    }

    #[test]
    fn walk_yields_declaration_order() {
        let config = sample();
        let leaves: Vec<Leaf> = leaves(&config).collect::<Result<_, _>>().unwrap();

        let paths: Vec<(&str, &str)> =
            leaves.iter().map(|l| (l.form, l.input.name)).collect();
        assert_eq!(
            paths,
            vec![
                ("link", "host"),
                ("link", "port"),
                ("link", "password"),
                ("throttling", "extractors"),
                ("throttling", "compress"),
            ]
        );

        assert_eq!(
            leaves[0].value,
            Some(InputValue::Text("db.example.com".to_string()))
        );
        assert_eq!(leaves[1].value, Some(InputValue::Integer(5432)));
        assert!(leaves[2].input.sensitive);
        assert!(!leaves[0].input.sensitive);
        assert_eq!(leaves[4].value, None);
    }

    #[test]
    fn walk_is_restartable() {
        let config = sample();
        let first: Vec<Leaf> = leaves(&config).collect::<Result<_, _>>().unwrap();
        let second: Vec<Leaf> = leaves(&config).collect::<Result<_, _>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn walk_then_absorb_reproduces_the_config() {
        let config = sample();
        let flattened: Vec<Leaf> = leaves(&config).collect::<Result<_, _>>().unwrap();

        let mut rebuilt = JobConfig::default();
        absorb(&mut rebuilt, flattened).unwrap();
        assert_eq!(rebuilt, config);
    }

    #[test]
    fn absorb_leaves_unmatched_inputs_at_default() {
        let mut rebuilt = JobConfig::default();
        absorb(
            &mut rebuilt,
            vec![Leaf {
                form: "link",
                input: InputSpec {
                    name: "host",
                    kind: InputKind::Text,
                    sensitive: false,
                },
                value: Some(InputValue::Text("h".to_string())),
            }],
        )
        .unwrap();

        assert_eq!(rebuilt.link.host.as_deref(), Some("h"));
        assert_eq!(rebuilt.link.port, None);
        assert_eq!(rebuilt.throttling.extractors, None);
    }

    #[test]
    fn absorb_rejects_unknown_form() {
        let mut rebuilt = JobConfig::default();
        let err = absorb(
            &mut rebuilt,
            vec![Leaf {
                form: "bogus",
                input: InputSpec {
                    name: "host",
                    kind: InputKind::Text,
                    sensitive: false,
                },
                value: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, MalformedConfigError::UnknownForm { .. }));
    }

    #[test]
    fn set_input_rejects_type_mismatch() {
        let mut form = LinkForm::default();
        let err = form
            .set_input("port", Some(InputValue::Text("not a port".to_string())))
            .unwrap_err();
        match err {
            MalformedConfigError::TypeMismatch {
                input,
                expected,
                found,
            } => {
                assert_eq!(input, "port");
                assert_eq!(expected, InputKind::Integer);
                assert_eq!(found, InputKind::Text);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // Hand-written impl: the derive refuses empty forms, so the runtime
    // check only fires for impls like this one.
    struct HollowForm;

    impl FormBlock for HollowForm {
        fn inputs(&self) -> &'static [InputSpec] {
            &[]
        }

        fn input_value(
            &self,
            input: &str,
        ) -> Result<Option<InputValue>, MalformedConfigError> {
            Err(MalformedConfigError::UnknownInput {
                input: input.to_string(),
            })
        }

        fn set_input(
            &mut self,
            input: &str,
            _value: Option<InputValue>,
        ) -> Result<(), MalformedConfigError> {
            Err(MalformedConfigError::UnknownInput {
                input: input.to_string(),
            })
        }
    }

    struct HollowConfig {
        hollow: HollowForm,
    }

    impl ConfigBlock for HollowConfig {
        fn forms(&self) -> Vec<(&'static str, &dyn FormBlock)> {
            vec![("hollow", &self.hollow as &dyn FormBlock)]
        }

        fn forms_mut(&mut self) -> Vec<(&'static str, &mut dyn FormBlock)> {
            vec![("hollow", &mut self.hollow as &mut dyn FormBlock)]
        }
    }

    #[test]
    fn empty_form_is_malformed() {
        let config = HollowConfig { hollow: HollowForm };
        let result: Result<Vec<Leaf>, _> = leaves(&config).collect();
        assert!(matches!(
            result.unwrap_err(),
            MalformedConfigError::EmptyForm { .. }
        ));
    }
}
