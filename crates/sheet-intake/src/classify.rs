//! Column classification (auto-mapping)

use crate::field::FieldName;
use crate::mapping::ColumnMapping;
use crate::profile::IntakeProfile;

/// Canonical form of a header cell: trimmed, inner whitespace collapsed to
/// single spaces, lower-cased
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Classify header cells into the profile's fields.
///
/// Greedy single pass, left to right. Each non-empty header is tried against
/// the profile's fields in priority order and goes to the first field that
/// matches and is still unmapped. Headers that match nothing, or only fields
/// already taken by an earlier column, stay unmapped. The result is a pure
/// function of `headers` and `profile`.
///
/// ```
/// use sheet_intake::{auto_map, IntakeProfile};
///
/// let headers = ["Style #", "Brand", "Notes", "SKU"];
/// let mapping = auto_map(&headers, &IntakeProfile::offer());
///
/// assert_eq!(mapping.get("style"), Some(0));
/// assert_eq!(mapping.get("brand"), Some(1));
/// assert_eq!(mapping.field_at(3), None); // style already taken by column 0
/// ```
pub fn auto_map<S: AsRef<str>>(headers: &[S], profile: &IntakeProfile) -> ColumnMapping {
    let mut mapping = ColumnMapping::for_profile(profile);

    for (column, raw) in headers.iter().enumerate() {
        let header = normalize_header(raw.as_ref());
        if header.is_empty() {
            continue;
        }

        let field = profile
            .fields()
            .iter()
            .filter(|spec| mapping.get(spec.name().as_str()).is_none())
            .find(|spec| spec.matches(&header))
            .map(|spec| spec.name().clone());

        match field {
            Some(field) => {
                tracing::debug!("Column {} ({:?}) classified as {}", column, raw.as_ref(), field);
                mapping.reassign(column, Some(field));
            }
            None => tracing::trace!("Column {} ({:?}) left unmapped", column, raw.as_ref()),
        }
    }

    mapping
}

/// Fields of `profile` that have no column after classification
pub fn unmapped_fields(mapping: &ColumnMapping, profile: &IntakeProfile) -> Vec<FieldName> {
    profile
        .fields()
        .iter()
        .filter(|spec| mapping.get(spec.name().as_str()).is_none())
        .map(|spec| spec.name().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FieldSpec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Style   #\t"), "style #");
        assert_eq!(normalize_header("Colour\nName"), "colour name");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn test_auto_map_offer_sheet() {
        let headers = [
            "Item #",
            "",
            "Manufacturer",
            "Colour",
            "Department",
            "Image URL",
            "Read Image",
        ];
        let mapping = auto_map(&headers, &IntakeProfile::offer());

        assert_eq!(mapping.get("style"), Some(0));
        assert_eq!(mapping.get("brand"), Some(2));
        assert_eq!(mapping.get("colorName"), Some(3));
        assert_eq!(mapping.get("category"), Some(4));
        assert_eq!(mapping.get("imageAdd"), Some(5));
        assert_eq!(mapping.get("readImage"), Some(6));
        assert_eq!(mapping.field_at(1), None);
    }

    #[test]
    fn test_auto_map_first_column_wins_duplicates() {
        let headers = ["Brand", "Style", "Label", "SKU"];
        let mapping = auto_map(&headers, &IntakeProfile::offer());

        assert_eq!(mapping.get("brand"), Some(0));
        assert_eq!(mapping.get("style"), Some(1));
        assert_eq!(mapping.field_at(2), None);
        assert_eq!(mapping.field_at(3), None);
    }

    #[test]
    fn test_auto_map_priority_breaks_overlaps() {
        // "price" matches both fields; priority decides, then the next
        // overlapping header falls through to the remaining field
        let profile = IntakeProfile::builder("overlap")
            .field(FieldSpec::required("style", "style").unwrap())
            .field(FieldSpec::required("cost", "cost|price").unwrap())
            .field(FieldSpec::optional("retail", "retail|price").unwrap())
            .build()
            .unwrap();

        let mapping = auto_map(&["Style", "Price", "Price"], &profile);
        assert_eq!(mapping.get("cost"), Some(1));
        assert_eq!(mapping.get("retail"), Some(2));
    }

    #[test]
    fn test_auto_map_ignores_non_matching() {
        let mapping = auto_map(&["Notes", "Qty", "Comments"], &IntakeProfile::warehouse());
        assert_eq!(mapping.mapped_count(), 0);
        assert_eq!(
            unmapped_fields(&mapping, &IntakeProfile::warehouse()).len(),
            5
        );
    }

    #[test]
    fn test_auto_map_keeps_every_profile_field() {
        let mapping = auto_map::<&str>(&[], &IntakeProfile::offer());
        assert_eq!(mapping.fields().count(), 6);
        assert_eq!(mapping.mapped_count(), 0);
    }

    const VOCABULARY: [&str; 12] = [
        "Style", "SKU", "Brand", "Label", "Category", "Color", "Image", "Read Image", "MSRP",
        "Notes", "", "Item #",
    ];

    proptest! {
        #[test]
        fn prop_auto_map_is_deterministic_and_injective(
            picks in proptest::collection::vec(0usize..VOCABULARY.len(), 0..16)
        ) {
            let headers: Vec<&str> = picks.iter().map(|&i| VOCABULARY[i]).collect();
            for profile in [IntakeProfile::offer(), IntakeProfile::warehouse()] {
                let first = auto_map(&headers, &profile);
                let second = auto_map(&headers, &profile);
                prop_assert_eq!(&first, &second);
                prop_assert!(first.is_consistent());
                for (_, col) in first.mapped() {
                    prop_assert!(col < headers.len());
                }
            }
        }
    }
}
