//! Entity-type vocabulary of the knowledge graph.

/// Abstract type covering every domain object and observable.
pub const ABSTRACT_STIX_CORE_OBJECT: &str = "Stix-Core-Object";

/// Concrete STIX domain object types.
pub const STIX_DOMAIN_OBJECT_TYPES: &[&str] = &[
    "Administrative-Area",
    "Attack-Pattern",
    "Campaign",
    "Case-Incident",
    "Case-Rfi",
    "Case-Rft",
    "Channel",
    "City",
    "Country",
    "Course-Of-Action",
    "Data-Component",
    "Data-Source",
    "Event",
    "Feedback",
    "Grouping",
    "Incident",
    "Indicator",
    "Individual",
    "Infrastructure",
    "Intrusion-Set",
    "Language",
    "Malware",
    "Malware-Analysis",
    "Narrative",
    "Note",
    "Observed-Data",
    "Opinion",
    "Organization",
    "Position",
    "Region",
    "Report",
    "Sector",
    "System",
    "Task",
    "Threat-Actor-Group",
    "Threat-Actor-Individual",
    "Tool",
    "Vulnerability",
];

/// Concrete STIX cyber-observable types.
pub const STIX_CYBER_OBSERVABLE_TYPES: &[&str] = &[
    "Artifact",
    "Autonomous-System",
    "Bank-Account",
    "Credential",
    "Cryptocurrency-Wallet",
    "Cryptographic-Key",
    "Directory",
    "Domain-Name",
    "Email-Addr",
    "Email-Message",
    "Email-Mime-Part-Type",
    "Hostname",
    "IPv4-Addr",
    "IPv6-Addr",
    "Mac-Addr",
    "Media-Content",
    "Mutex",
    "Network-Traffic",
    "Payment-Card",
    "Persona",
    "Phone-Number",
    "Process",
    "Software",
    "StixFile",
    "Text",
    "Tracking-Number",
    "Url",
    "User-Account",
    "User-Agent",
    "Windows-Registry-Key",
    "Windows-Registry-Value-Type",
    "X509-Certificate",
];

/// Internal platform types a public principal must never read.
pub const NON_PUBLIC_ENTITY_TYPES: &[&str] = &[
    "Public-Dashboard",
    "Workspace",
    "User",
    "Group",
    "Role",
    "Capability",
    "Settings",
    "MarkingDefinition-Settings",
];

/// Whether `entity_type` is a recognized core-object kind (domain object or
/// observable).
pub fn is_stix_core_object(entity_type: &str) -> bool {
    STIX_DOMAIN_OBJECT_TYPES.contains(&entity_type)
        || STIX_CYBER_OBSERVABLE_TYPES.contains(&entity_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_objects_and_observables_are_core_objects() {
        assert!(is_stix_core_object("Malware"));
        assert!(is_stix_core_object("IPv4-Addr"));
    }

    #[test]
    fn relationships_and_internal_types_are_not() {
        assert!(!is_stix_core_object("targets"));
        assert!(!is_stix_core_object("stix-core-relationship"));
        assert!(!is_stix_core_object("Public-Dashboard"));
    }
}
