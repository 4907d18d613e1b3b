use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClosestMatch {
    pub candidate: String,
    pub similarity: f64,
}

/// Best candidate above the suggestion threshold, used for "did you mean" hints
/// on unknown actions and environments.
pub fn closest_name<'a>(
    needle: &str,
    hay: impl IntoIterator<Item = &'a str>,
) -> Option<ClosestMatch> {
    const THRESHOLD: f64 = 0.55;

    let mut best: Option<ClosestMatch> = None;
    for candidate in hay {
        let sim = strsim::normalized_levenshtein(needle, candidate);
        if sim >= THRESHOLD && best.as_ref().map_or(true, |b| sim > b.similarity) {
            best = Some(ClosestMatch {
                candidate: candidate.to_string(),
                similarity: sim,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_name_exact() {
        let hit = closest_name("deploy_dag", ["deploy_dag", "pause_dag"]).unwrap();
        assert_eq!(hit.candidate, "deploy_dag");
        assert!((hit.similarity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_closest_name_typo() {
        let hit = closest_name("deploy_dga", ["deploy_dag"]).unwrap();
        assert_eq!(hit.candidate, "deploy_dag");
        assert!(hit.similarity > 0.7);
    }

    #[test]
    fn test_closest_name_none() {
        assert!(closest_name("zulu", ["deploy_dag", "prod"]).is_none());
    }
}
