use crate::config::Params;
use crate::registry::TemplateSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No value for template parameter '{0}'")]
    MissingParameter(String),
    #[error("Unterminated '{{' marker in template '{0}'")]
    UnterminatedMarker(String),
}

/// Substitute every `{name}` marker in `template` with its value from
/// `params`.
///
/// Substitution is textual, not semantic: values are spliced in without any
/// quoting or escaping, so parameter values containing shell metacharacters
/// end up in the command verbatim. The benchmark trusts its own config file.
pub fn resolve(template: &str, params: &Params) -> Result<String, ResolveError> {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| ResolveError::UnterminatedMarker(template.to_string()))?;
        let name = &after[..end];
        let value = params
            .get(name)
            .ok_or_else(|| ResolveError::MissingParameter(name.to_string()))?;
        resolved.push_str(value);
        rest = &after[end + 1..];
    }

    resolved.push_str(rest);
    Ok(resolved)
}

/// Resolve each template in a set independently, preserving order.
pub fn resolve_set(set: &TemplateSet, params: &Params) -> Result<Vec<String>, ResolveError> {
    set.templates()
        .iter()
        .map(|template| resolve(template, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{templates_for, Phase, Vendor};

    fn full_params() -> Params {
        Params::from([
            ("dbname".to_string(), "bench".to_string()),
            ("dbuser".to_string(), "bench".to_string()),
            ("dbpassword".to_string(), "secret".to_string()),
            ("ts_name".to_string(), "benchts".to_string()),
            ("ts_path".to_string(), "/data/ts".to_string()),
            ("script_path".to_string(), "/scripts".to_string()),
        ])
    }

    #[test]
    fn postgres_create_table_resolves_exactly() {
        let set = templates_for(Vendor::Postgres, Phase::CreateTable).unwrap();
        assert_eq!(
            resolve_set(set, &full_params()).unwrap(),
            vec!["psql -d bench -f /scripts/schema.sql".to_string()]
        );
    }

    #[test]
    fn oracle_query0_resolves_exactly() {
        let set = templates_for(Vendor::Oracle, Phase::Query0).unwrap();
        assert_eq!(
            resolve_set(set, &full_params()).unwrap(),
            vec!["sqlplus bench/secret @/scripts/qtype0.sql".to_string()]
        );
    }

    #[test]
    fn resolution_leaves_no_markers_behind() {
        let params = full_params();

        for vendor in [Vendor::Postgres, Vendor::Oracle, Vendor::Informix] {
            for phase in Phase::SEQUENCE {
                let set = templates_for(vendor, phase).unwrap();
                for command in resolve_set(set, &params).unwrap() {
                    assert!(
                        !command.contains('{') && !command.contains('}'),
                        "unresolved marker in {vendor}/{phase}: {command}"
                    );
                }
            }
        }
    }

    #[test]
    fn missing_parameter_is_an_error_not_a_partial_command() {
        let mut params = full_params();
        params.remove("script_path");

        let set = templates_for(Vendor::Postgres, Phase::CreateTable).unwrap();
        assert_eq!(
            resolve_set(set, &params),
            Err(ResolveError::MissingParameter("script_path".to_string()))
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let params = full_params();
        let set = templates_for(Vendor::Informix, Phase::LoadData).unwrap();

        assert_eq!(
            resolve_set(set, &params).unwrap(),
            resolve_set(set, &params).unwrap()
        );
    }

    #[test]
    fn unterminated_marker_is_rejected() {
        assert_eq!(
            resolve("psql -d {dbname", &full_params()),
            Err(ResolveError::UnterminatedMarker(
                "psql -d {dbname".to_string()
            ))
        );
    }
}
