/// Arrangement algorithm
///
/// Pure, copy-on-write transformations of a photograph set. Every function
/// takes the full current set and returns a new full set; the input is never
/// touched. Actions whose preconditions do not hold (unknown id, photograph
/// in the wrong partition, index out of range) return an unchanged copy.
///
/// All of them keep the contiguity invariant: the orders of placed
/// photographs are exactly `1..=N`.
use std::collections::HashMap;

use tracing::debug;

use crate::state::data::{Dimension, Photograph, Placement, MAX_SPAN, MIN_SPAN};

/// Photographs that are not part of the layout, in set order
pub fn available(photos: &[Photograph]) -> Vec<&Photograph> {
    photos.iter().filter(|p| !p.is_placed()).collect()
}

/// Photographs in the layout, sorted by order
pub fn selected(photos: &[Photograph]) -> Vec<&Photograph> {
    let mut placed: Vec<&Photograph> = photos.iter().filter(|p| p.is_placed()).collect();
    placed.sort_by_key(|p| p.order());
    placed
}

/// Index of a placed photograph in the sorted selected view
pub fn selected_index(photos: &[Photograph], id: &str) -> Option<usize> {
    selected(photos).iter().position(|p| p.id == id)
}

/// Whether placed orders form `1..=N` without gaps or duplicates
pub fn orders_are_contiguous(photos: &[Photograph]) -> bool {
    let mut orders: Vec<u32> = photos.iter().filter_map(|p| p.layout.map(|l| l.order)).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &order)| order == i as u32 + 1)
}

fn find<'a>(photos: &'a [Photograph], id: &str) -> Option<&'a Photograph> {
    photos.iter().find(|p| p.id == id)
}

/// Place an available photograph at the end of the layout
pub fn add_to_layout(photos: &[Photograph], id: &str) -> Vec<Photograph> {
    match find(photos, id) {
        Some(p) if !p.is_placed() => {}
        _ => {
            debug!(id, "add ignored: photograph missing or already placed");
            return photos.to_vec();
        }
    }

    let next = photos.iter().filter(|p| p.is_placed()).count() as u32 + 1;

    photos
        .iter()
        .map(|p| {
            if p.id == id {
                p.with_layout(Some(Placement::new(next)))
            } else {
                p.clone()
            }
        })
        .collect()
}

/// Take a placed photograph out of the layout and close the gap it leaves
pub fn remove_from_layout(photos: &[Photograph], id: &str) -> Vec<Photograph> {
    let removed = match find(photos, id).and_then(|p| p.layout) {
        Some(layout) => layout.order,
        None => {
            debug!(id, "remove ignored: photograph missing or not placed");
            return photos.to_vec();
        }
    };

    photos
        .iter()
        .map(|p| match p.layout {
            _ if p.id == id => p.with_layout(None),
            Some(layout) if layout.order > removed => {
                p.with_layout(Some(layout.with_order(layout.order - 1)))
            }
            _ => p.clone(),
        })
        .collect()
}

/// Move the selected item at `old_index` to `new_index` and renumber
///
/// Indices address the sorted selected view. Items between the two
/// positions shift by one, then every placed photograph gets
/// `order = position + 1`.
pub fn reorder(photos: &[Photograph], old_index: usize, new_index: usize) -> Vec<Photograph> {
    let mut sequence: Vec<&str> = selected(photos).iter().map(|p| p.id.as_str()).collect();

    if old_index == new_index || old_index >= sequence.len() || new_index >= sequence.len() {
        if old_index != new_index {
            debug!(old_index, new_index, len = sequence.len(), "reorder ignored: index out of range");
        }
        return photos.to_vec();
    }

    let moved = sequence.remove(old_index);
    sequence.insert(new_index, moved);

    let ranks: HashMap<&str, u32> = sequence
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position as u32 + 1))
        .collect();

    photos
        .iter()
        .map(|p| match (p.layout, ranks.get(p.id.as_str())) {
            (Some(layout), Some(&rank)) if layout.order != rank => {
                p.with_layout(Some(layout.with_order(rank)))
            }
            _ => p.clone(),
        })
        .collect()
}

/// Grow or shrink one dimension of a placed photograph, clamped to the span bounds
pub fn resize(photos: &[Photograph], id: &str, dimension: Dimension, delta: i8) -> Vec<Photograph> {
    let layout = match find(photos, id).and_then(|p| p.layout) {
        Some(layout) => layout,
        None => {
            debug!(id, "resize ignored: photograph missing or not placed");
            return photos.to_vec();
        }
    };

    let current = layout.span(dimension);
    let target = (i16::from(current) + i16::from(delta)).clamp(i16::from(MIN_SPAN), i16::from(MAX_SPAN)) as u8;

    // Already at the bound: leave the stored value (possibly None) untouched
    if target == current {
        return photos.to_vec();
    }

    photos
        .iter()
        .map(|p| {
            if p.id == id {
                p.with_layout(Some(layout.with_span(dimension, target)))
            } else {
                p.clone()
            }
        })
        .collect()
}

/// Swap a placed photograph with its neighbour `offset` orders away (+1 or -1)
///
/// No-op when there is no photograph at the neighbouring order. The swap is a
/// two-position [`reorder`].
pub fn swap_with_neighbour(photos: &[Photograph], id: &str, offset: i32) -> Vec<Photograph> {
    let order = match find(photos, id) {
        Some(p) if p.is_placed() => p.order() as i64,
        _ => return photos.to_vec(),
    };
    let neighbour = order + i64::from(offset);

    if neighbour < 1 || !photos.iter().any(|p| i64::from(p.order()) == neighbour) {
        return photos.to_vec();
    }

    let from = selected_index(photos, id);
    let to = selected(photos).iter().position(|p| i64::from(p.order()) == neighbour);

    match (from, to) {
        (Some(from), Some(to)) => reorder(photos, from, to),
        _ => photos.to_vec(),
    }
}

/// Restore the layout invariants on a set coming from storage
///
/// Orders are renumbered to `1..=N` keeping their relative sequence (ties
/// keep set order) and spans are clamped into bounds. Returns the set
/// unchanged when it already holds the invariants.
pub fn normalize(photos: &[Photograph]) -> Vec<Photograph> {
    let ranks: HashMap<&str, u32> = selected(photos)
        .iter()
        .enumerate()
        .map(|(position, p)| (p.id.as_str(), position as u32 + 1))
        .collect();

    let clamp = |span: Option<u8>| span.map(|v| v.clamp(MIN_SPAN, MAX_SPAN));

    photos
        .iter()
        .map(|p| match (p.layout, ranks.get(p.id.as_str())) {
            (Some(layout), Some(&rank)) => {
                let fixed = Placement {
                    order: rank,
                    width: clamp(layout.width),
                    height: clamp(layout.height),
                };
                if fixed == layout {
                    p.clone()
                } else {
                    p.with_layout(Some(fixed))
                }
            }
            _ => p.clone(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    pub(crate) fn photo(id: &str, order: Option<u32>) -> Photograph {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Photograph {
            id: id.to_string(),
            title: id.to_uppercase(),
            images: Vec::new(),
            capture_time: time,
            upload_time: time,
            layout: order.map(Placement::new),
        }
    }

    /// Selected view as (id, order) pairs
    pub(crate) fn layout_of(photos: &[Photograph]) -> Vec<(String, u32)> {
        selected(photos).iter().map(|p| (p.id.clone(), p.order())).collect()
    }

    fn pairs(items: &[(&str, u32)]) -> Vec<(String, u32)> {
        items.iter().map(|(id, o)| (id.to_string(), *o)).collect()
    }

    fn abcd() -> Vec<Photograph> {
        vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3)), photo("d", Some(4))]
    }

    #[test]
    fn test_add_appends_last() {
        let photos = vec![photo("a", Some(1)), photo("x", None), photo("b", Some(2))];

        let result = add_to_layout(&photos, "x");

        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("b", 2), ("x", 3)]));
        let added = result.iter().find(|p| p.id == "x").unwrap().layout.unwrap();
        assert_eq!((added.width, added.height), (Some(1), Some(1)));
        // input untouched
        assert!(!photos[1].is_placed());
    }

    #[test]
    fn test_add_placed_photo_is_noop() {
        let photos = abcd();
        assert_eq!(add_to_layout(&photos, "b"), photos);
        assert_eq!(add_to_layout(&photos, "missing"), photos);
    }

    #[test]
    fn test_remove_renumbers_following() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3))];

        let result = remove_from_layout(&photos, "b");

        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("c", 2)]));
        assert!(available(&result).iter().any(|p| p.id == "b"));
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("x", None)];

        let result = remove_from_layout(&add_to_layout(&photos, "x"), "x");

        assert_eq!(result, photos);
    }

    #[test]
    fn test_reorder_moves_forward() {
        let result = reorder(&abcd(), 0, 2);
        assert_eq!(layout_of(&result), pairs(&[("b", 1), ("c", 2), ("a", 3), ("d", 4)]));
    }

    #[test]
    fn test_reorder_moves_backward() {
        let result = reorder(&abcd(), 3, 1);
        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("d", 2), ("b", 3), ("c", 4)]));
    }

    #[test]
    fn test_reorder_same_or_out_of_range_is_noop() {
        let photos = abcd();
        assert_eq!(reorder(&photos, 2, 2), photos);
        assert_eq!(reorder(&photos, 0, 4), photos);
        assert_eq!(reorder(&photos, 9, 0), photos);
    }

    #[test]
    fn test_reorder_keeps_spans() {
        let mut photos = abcd();
        photos[0].layout = Some(Placement { order: 1, width: Some(3), height: Some(2) });

        let result = reorder(&photos, 0, 3);
        let a = result.iter().find(|p| p.id == "a").unwrap().layout.unwrap();

        assert_eq!(a, Placement { order: 4, width: Some(3), height: Some(2) });
    }

    #[test]
    fn test_resize_clamps_at_bounds() {
        let photos = abcd();

        let shrunk = resize(&photos, "a", Dimension::Width, -1);
        assert_eq!(shrunk, photos);

        let mut grown = photos.clone();
        for _ in 0..5 {
            grown = resize(&grown, "a", Dimension::Width, 1);
        }
        let a = grown.iter().find(|p| p.id == "a").unwrap().layout.unwrap();
        assert_eq!(a.width, Some(3));
        assert_eq!(a.height, Some(1));
    }

    #[test]
    fn test_resize_treats_missing_span_as_one() {
        let mut photos = abcd();
        photos[1].layout = Some(Placement { order: 2, width: None, height: None });

        let result = resize(&photos, "b", Dimension::Height, 1);
        let b = result.iter().find(|p| p.id == "b").unwrap().layout.unwrap();

        assert_eq!(b.height, Some(2));
        assert_eq!(b.width, None);
    }

    #[test]
    fn test_resize_unplaced_is_noop() {
        let photos = vec![photo("a", Some(1)), photo("x", None)];
        assert_eq!(resize(&photos, "x", Dimension::Width, 1), photos);
    }

    #[test]
    fn test_swap_with_neighbour() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2))];

        let swapped = swap_with_neighbour(&photos, "a", 1);
        assert_eq!(layout_of(&swapped), pairs(&[("b", 1), ("a", 2)]));

        assert_eq!(swap_with_neighbour(&photos, "b", 1), photos);
        assert_eq!(swap_with_neighbour(&photos, "a", -1), photos);
    }

    #[test]
    fn test_normalize_fixes_gaps_and_spans() {
        let mut photos = vec![photo("a", Some(4)), photo("b", Some(9)), photo("c", None)];
        photos[1].layout = Some(Placement { order: 9, width: Some(7), height: Some(0) });

        let result = normalize(&photos);

        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("b", 2)]));
        let b = result[1].layout.unwrap();
        assert_eq!((b.width, b.height), (Some(3), Some(1)));
        assert!(orders_are_contiguous(&result));
        assert_eq!(normalize(&result), result);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Remove(usize),
        Reorder(usize, usize),
        Resize(usize, bool, bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..8usize).prop_map(Op::Add),
            (0..8usize).prop_map(Op::Remove),
            (0..10usize, 0..10usize).prop_map(|(a, b)| Op::Reorder(a, b)),
            (0..8usize, any::<bool>(), any::<bool>()).prop_map(|(i, w, g)| Op::Resize(i, w, g)),
        ]
    }

    proptest! {
        #[test]
        fn prop_orders_stay_contiguous(ops in prop::collection::vec(op(), 0..64)) {
            let mut photos: Vec<Photograph> = (0..8).map(|i| photo(&format!("p{}", i), None)).collect();

            for op in ops {
                photos = match op {
                    Op::Add(i) => add_to_layout(&photos, &format!("p{}", i)),
                    Op::Remove(i) => remove_from_layout(&photos, &format!("p{}", i)),
                    Op::Reorder(a, b) => reorder(&photos, a, b),
                    Op::Resize(i, width, grow) => {
                        let dimension = if width { Dimension::Width } else { Dimension::Height };
                        resize(&photos, &format!("p{}", i), dimension, if grow { 1 } else { -1 })
                    }
                };

                prop_assert!(orders_are_contiguous(&photos));
                prop_assert_eq!(photos.len(), 8);
                for p in &photos {
                    if let Some(layout) = p.layout {
                        prop_assert!((MIN_SPAN..=MAX_SPAN).contains(&layout.span(Dimension::Width)));
                        prop_assert!((MIN_SPAN..=MAX_SPAN).contains(&layout.span(Dimension::Height)));
                    }
                }
            }
        }
    }
}
