//! Map annotations and the reconciliation diff.

use crate::geo::GeoPoint;

/// A single relief resource request as delivered by the fetch collaborator.
///
/// Records have no persistent identifier; identity is by value. The full
/// list is replaced on every refresh.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestRecord {
    /// Where help is needed.
    pub coordinate: GeoPoint,
    /// Set when the request was filed on behalf of somebody at another
    /// location. Such requests are not shown on the map.
    pub is_for_others: bool,
    /// Primary callout text.
    pub title: Option<String>,
    /// Secondary callout text.
    pub subtitle: Option<String>,
}

/// A marker displayed on the map surface.
///
/// The discriminant makes the marker kind explicit, so callers never need
/// to inspect the concrete type behind a map handle. Reconciliation manages
/// only the [`Annotation::Request`] subset; the other variants are placed
/// once and left alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// A relief request pin.
    Request(RequestRecord),
    /// The device position marker. At most one per session.
    CurrentLocation(GeoPoint),
    /// A pin placed from an address search result.
    Address {
        /// Position of the selected address.
        coordinate: GeoPoint,
        /// Address display name.
        title: Option<String>,
        /// Locality or other secondary text.
        subtitle: Option<String>,
    },
}

impl Annotation {
    /// Coordinate the marker is anchored to.
    pub fn coordinate(&self) -> GeoPoint {
        match self {
            Annotation::Request(record) => record.coordinate,
            Annotation::CurrentLocation(point) => *point,
            Annotation::Address { coordinate, .. } => *coordinate,
        }
    }

    fn as_request(&self) -> Option<&RequestRecord> {
        match self {
            Annotation::Request(record) => Some(record),
            _ => None,
        }
    }
}

/// Add/remove operations that move the visible annotation set to the
/// desired one.
///
/// Applying `to_remove` and then `to_add` to the map surface leaves its
/// `Request` annotations exactly equal to the desired set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationDiff {
    /// Annotations missing from the map.
    pub to_add: Vec<Annotation>,
    /// Annotations that are no longer wanted.
    pub to_remove: Vec<Annotation>,
}

impl AnnotationDiff {
    /// Whether applying the diff would change anything.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the minimal operations reconciling the visible set against the
/// desired request list.
///
/// The desired set is `desired` filtered to records not filed for others.
/// Entries present in both sets produce no operations, so repeated calls
/// with unchanged input yield an empty diff and the map never flickers.
/// Non-`Request` annotations in `current` (the location marker, address
/// pins) are never removed.
pub fn reconcile(current: &[Annotation], desired: &[RequestRecord]) -> AnnotationDiff {
    let desired: Vec<&RequestRecord> = desired.iter().filter(|r| !r.is_for_others).collect();

    let to_remove = current
        .iter()
        .filter(|a| a.as_request().is_some_and(|r| !desired.contains(&r)))
        .cloned()
        .collect();

    let to_add = desired
        .iter()
        .filter(|d| !current.iter().any(|a| a.as_request() == Some(*d)))
        .map(|d| Annotation::Request((*d).clone()))
        .collect();

    AnnotationDiff { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(latitude: f64, longitude: f64, is_for_others: bool) -> RequestRecord {
        RequestRecord {
            coordinate: GeoPoint::latlon(latitude, longitude),
            is_for_others,
            title: None,
            subtitle: None,
        }
    }

    fn apply(visible: &mut Vec<Annotation>, diff: &AnnotationDiff) {
        visible.retain(|a| !diff.to_remove.contains(a));
        visible.extend(diff.to_add.iter().cloned());
    }

    #[test]
    fn every_variant_exposes_its_anchor_coordinate() {
        let point = GeoPoint::latlon(12.9, 77.6);

        assert_eq!(
            Annotation::Request(RequestRecord {
                coordinate: point,
                ..Default::default()
            })
            .coordinate(),
            point
        );
        assert_eq!(Annotation::CurrentLocation(point).coordinate(), point);
        assert_eq!(
            Annotation::Address {
                coordinate: point,
                title: None,
                subtitle: None,
            }
            .coordinate(),
            point
        );
    }

    #[test]
    fn requests_for_others_are_filtered_out() {
        let a = record(10.0, 76.0, false);
        let b = record(10.1, 76.1, true);
        let c = record(10.2, 76.2, false);

        let diff = reconcile(&[], &[a.clone(), b, c.clone()]);

        assert_eq!(
            diff.to_add,
            vec![Annotation::Request(a), Annotation::Request(c)]
        );
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let desired = vec![record(10.0, 76.0, false), record(10.2, 76.2, false)];

        let mut visible = Vec::new();
        let first = reconcile(&visible, &desired);
        apply(&mut visible, &first);
        assert_eq!(first.to_add.len(), 2);

        let second = reconcile(&visible, &desired);
        assert!(second.is_empty());
    }

    #[test]
    fn unchanged_entries_produce_no_operations() {
        let kept = record(10.0, 76.0, false);
        let dropped = record(10.1, 76.1, false);
        let added = record(10.2, 76.2, false);

        let visible = vec![
            Annotation::Request(kept.clone()),
            Annotation::Request(dropped.clone()),
        ];
        let diff = reconcile(&visible, &[kept, added.clone()]);

        assert_eq!(diff.to_add, vec![Annotation::Request(added)]);
        assert_eq!(diff.to_remove, vec![Annotation::Request(dropped)]);
    }

    #[test]
    fn non_request_annotations_are_never_removed() {
        let marker = Annotation::CurrentLocation(GeoPoint::latlon(12.9, 77.6));
        let pin = Annotation::Address {
            coordinate: GeoPoint::latlon(12.8, 77.5),
            title: Some("Shelter".into()),
            subtitle: None,
        };

        let diff = reconcile(&[marker, pin], &[]);

        assert!(diff.is_empty());
    }

    #[test]
    fn emptied_list_removes_all_requests() {
        let visible = vec![
            Annotation::Request(record(10.0, 76.0, false)),
            Annotation::Request(record(10.1, 76.1, false)),
        ];

        let diff = reconcile(&visible, &[]);

        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, visible);
    }
}
