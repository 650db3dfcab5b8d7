//! Entitlement resolution, done once before the transfer starts.

use fodupload_protocol::{EntitlementPreferenceType, ReleaseAssessmentType};
use tracing::{debug, info};

use crate::connection::EntitlementLookup;
use crate::error::UploadError;
use crate::types::{EntitlementInfo, ScanOptions, ScanTarget, UploadTargetDescriptor};

/// Picks the entitlement for `assessment_type_id` among a release's
/// assessment types.
///
/// Only entries with a positive entitlement id qualify. Among those, an
/// entry whose frequency type matches `preference` wins; otherwise the first
/// qualifying entry is used.
pub fn select_entitlement(
    types: &[ReleaseAssessmentType],
    assessment_type_id: i64,
    preference: EntitlementPreferenceType,
) -> Result<EntitlementInfo, UploadError> {
    let candidates: Vec<&ReleaseAssessmentType> = types
        .iter()
        .filter(|t| t.assessment_type_id == assessment_type_id)
        .collect();

    if candidates.is_empty() {
        return Err(UploadError::Entitlement(format!(
            "assessment type {assessment_type_id} is not available for this release"
        )));
    }

    let wanted = preference.frequency_type_id();
    let chosen = candidates
        .iter()
        .filter(|t| t.entitlement_id > 0)
        .find(|t| t.frequency_type_id == wanted)
        .or_else(|| candidates.iter().find(|t| t.entitlement_id > 0))
        .ok_or_else(|| {
            UploadError::Entitlement(format!(
                "no valid entitlement for assessment type {assessment_type_id}"
            ))
        })?;

    if chosen.frequency_type_id != wanted {
        debug!(
            requested = %preference,
            frequency_type = %chosen.frequency_type,
            "preferred entitlement type unavailable, using fallback"
        );
    }

    Ok(EntitlementInfo {
        entitlement_id: chosen.entitlement_id,
        frequency_type_id: chosen.frequency_type_id,
        is_bundled_assessment: chosen.is_bundled_assessment,
        parent_assessment_type_id: chosen.parent_assessment_type_id,
    })
}

/// Looks up the entitlement and freezes the upload descriptor.
pub async fn resolve_target(
    lookup: &dyn EntitlementLookup,
    token: &str,
    target: ScanTarget,
    options: ScanOptions,
) -> Result<UploadTargetDescriptor, UploadError> {
    let types = lookup.assessment_types(token, target.release_id).await?;
    let entitlement = select_entitlement(
        &types,
        target.assessment_type_id,
        options.entitlement_preference,
    )?;

    info!(
        release = target.release_id,
        assessment_type = target.assessment_type_id,
        entitlement = entitlement.entitlement_id,
        bundled = entitlement.is_bundled_assessment,
        "entitlement resolved"
    );

    Ok(UploadTargetDescriptor {
        target,
        options,
        entitlement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    fn assessment(id: i64, entitlement_id: i64, frequency_type_id: i64) -> ReleaseAssessmentType {
        ReleaseAssessmentType {
            assessment_type_id: id,
            name: format!("Static {id}"),
            entitlement_id,
            frequency_type: if frequency_type_id == 2 {
                "Subscription".into()
            } else {
                "SingleScan".into()
            },
            frequency_type_id,
            units: 1,
            units_available: 10,
            is_remediation: false,
            is_bundled_assessment: false,
            parent_assessment_type_id: 0,
        }
    }

    struct MockLookup {
        types: Vec<ReleaseAssessmentType>,
        calls: Mutex<Vec<(String, i64)>>,
    }

    impl EntitlementLookup for MockLookup {
        fn assessment_types<'a>(
            &'a self,
            token: &'a str,
            release_id: i64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<ReleaseAssessmentType>, UploadError>> + Send + 'a>>
        {
            self.calls
                .lock()
                .unwrap()
                .push((token.to_string(), release_id));
            Box::pin(async move { Ok(self.types.clone()) })
        }
    }

    #[test]
    fn prefers_matching_frequency() {
        let types = vec![assessment(7, 10, 1), assessment(7, 20, 2)];
        let info = select_entitlement(&types, 7, EntitlementPreferenceType::Subscription).unwrap();
        assert_eq!(info.entitlement_id, 20);
        assert_eq!(info.frequency_type_id, 2);
    }

    #[test]
    fn falls_back_to_any_valid_entitlement() {
        let types = vec![assessment(7, 10, 1)];
        let info = select_entitlement(&types, 7, EntitlementPreferenceType::Subscription).unwrap();
        assert_eq!(info.entitlement_id, 10);
    }

    #[test]
    fn skips_entries_without_entitlement() {
        let types = vec![assessment(7, 0, 1), assessment(7, 30, 2)];
        let info = select_entitlement(&types, 7, EntitlementPreferenceType::SingleScan).unwrap();
        assert_eq!(info.entitlement_id, 30);
    }

    #[test]
    fn unknown_assessment_type_is_error() {
        let types = vec![assessment(8, 10, 1)];
        let result = select_entitlement(&types, 7, EntitlementPreferenceType::SingleScan);
        assert!(matches!(result, Err(UploadError::Entitlement(_))));
    }

    #[test]
    fn no_positive_entitlement_is_error() {
        let types = vec![assessment(7, 0, 1), assessment(7, -1, 2)];
        let result = select_entitlement(&types, 7, EntitlementPreferenceType::SingleScan);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no valid entitlement"));
    }

    #[test]
    fn bundle_fields_are_carried() {
        let mut bundled = assessment(7, 10, 1);
        bundled.is_bundled_assessment = true;
        bundled.parent_assessment_type_id = 3;
        let info =
            select_entitlement(&[bundled], 7, EntitlementPreferenceType::SingleScan).unwrap();
        assert!(info.is_bundled_assessment);
        assert_eq!(info.parent_assessment_type_id, 3);
    }

    #[tokio::test]
    async fn resolve_target_builds_descriptor() {
        let lookup = MockLookup {
            types: vec![assessment(7, 55, 1)],
            calls: Mutex::new(Vec::new()),
        };
        let target = ScanTarget {
            release_id: 1234,
            assessment_type_id: 7,
            technology_stack: "PYTHON".into(),
            language_level: Some("3".into()),
        };

        let descriptor = resolve_target(&lookup, "tok", target.clone(), ScanOptions::default())
            .await
            .unwrap();

        assert_eq!(descriptor.target, target);
        assert_eq!(descriptor.entitlement.entitlement_id, 55);
        assert_eq!(*lookup.calls.lock().unwrap(), vec![("tok".to_string(), 1234)]);
    }
}
