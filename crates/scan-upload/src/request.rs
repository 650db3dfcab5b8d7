//! Per-fragment request composition.

use fodupload_protocol::constants::start_scan_path;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::types::{FragmentDescriptor, UploadRequest, UploadTargetDescriptor};

/// Everything except RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Builds the start-scan POST for one fragment.
///
/// Pure: the same inputs always produce the same request.
pub fn build_request(
    descriptor: &UploadTargetDescriptor,
    token: &str,
    fragment: &FragmentDescriptor,
) -> UploadRequest {
    let target = &descriptor.target;
    let options = &descriptor.options;
    let entitlement = &descriptor.entitlement;

    let mut query: Vec<(&'static str, String)> = vec![
        ("assessmentTypeId", target.assessment_type_id.to_string()),
        ("technologyStack", target.technology_stack.clone()),
        ("entitlementId", entitlement.entitlement_id.to_string()),
        (
            "entitlementFrequencyType",
            entitlement.frequency_type_id.to_string(),
        ),
        (
            "isBundledAssessment",
            entitlement.is_bundled_assessment.to_string(),
        ),
    ];
    if entitlement.is_bundled_assessment && entitlement.parent_assessment_type_id != 0 {
        query.push((
            "parentAssessmentTypeId",
            entitlement.parent_assessment_type_id.to_string(),
        ));
    }
    if let Some(level) = &target.language_level {
        query.push(("languageLevel", level.clone()));
    }
    if let Some(pref) = options.scan_preference {
        query.push(("scanPreferenceType", pref.to_string()));
    }
    if let Some(pref) = options.audit_preference {
        query.push(("auditPreferenceType", pref.to_string()));
    }
    query.push(("doSonatypeScan", options.run_sonatype_scan.to_string()));
    query.push(("isRemediationScan", options.is_remediation_scan.to_string()));
    query.push((
        "excludeThirdPartyLibs",
        (!options.include_third_party_libs).to_string(),
    ));
    query.push(("fragNo", fragment.number.to_string()));
    query.push(("offset", fragment.offset.to_string()));

    UploadRequest {
        path: start_scan_path(target.release_id),
        query,
        bearer_token: token.to_string(),
        content_type: OCTET_STREAM,
        body: fragment.payload.clone(),
    }
}

impl UploadRequest {
    /// Path plus percent-encoded query string.
    pub fn path_and_query(&self) -> String {
        let mut out = self.path.clone();
        for (i, (name, value)) in self.query.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(name);
            out.push('=');
            out.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        out
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }
}
