//! Pointer-vs-rectangle classification for list-item drop targets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// Bounding rectangle of a drop target in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TargetRect {
    pub fn contains(self, pointer: PointerPosition) -> bool {
        let (x, y) = (i64::from(pointer.x), i64::from(pointer.y));
        x >= i64::from(self.x)
            && x < i64::from(self.x) + i64::from(self.width)
            && y >= i64::from(self.y)
            && y < i64::from(self.y) + i64::from(self.height)
    }
}

/// Direction in which a list of targets is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragAxis {
    /// Rows stacked top to bottom (file tree).
    Vertical,
    /// Headers laid out left to right (tab bar).
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropOperation {
    /// Drop inside the target container.
    Combine,
    ReorderBefore,
    ReorderAfter,
}

/// Classifies where `pointer` falls within `rect` along `axis`.
///
/// With `combine` available the leading quarter means before, the trailing quarter after, and
/// the core between them combine. Without it the target splits in halves. Pointers outside the
/// rectangle are clamped to its nearest edge.
pub fn classify_drop(
    rect: TargetRect,
    pointer: PointerPosition,
    axis: DragAxis,
    combine: bool,
) -> DropOperation {
    let (start, extent, at) = match axis {
        DragAxis::Vertical => (rect.y, rect.height, pointer.y),
        DragAxis::Horizontal => (rect.x, rect.width, pointer.x),
    };
    // i64 keeps every i32 pointer/rect combination in range.
    let extent = i64::from(extent.max(1));
    let offset = (i64::from(at) - i64::from(start)).clamp(0, extent - 1);

    if combine {
        // Integer form of offset < extent / 4 and offset >= extent * 3 / 4.
        if offset * 4 < extent {
            DropOperation::ReorderBefore
        } else if offset * 4 >= extent * 3 {
            DropOperation::ReorderAfter
        } else {
            DropOperation::Combine
        }
    } else if offset * 2 < extent {
        DropOperation::ReorderBefore
    } else {
        DropOperation::ReorderAfter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: TargetRect = TargetRect {
        x: 0,
        y: 100,
        width: 200,
        height: 40,
    };

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn folder_rows_split_into_three_zones() {
        let classify = |y| classify_drop(ROW, at(10, y), DragAxis::Vertical, true);
        assert_eq!(classify(100), DropOperation::ReorderBefore);
        assert_eq!(classify(109), DropOperation::ReorderBefore);
        assert_eq!(classify(110), DropOperation::Combine);
        assert_eq!(classify(129), DropOperation::Combine);
        assert_eq!(classify(130), DropOperation::ReorderAfter);
        assert_eq!(classify(139), DropOperation::ReorderAfter);
    }

    #[test]
    fn file_rows_split_in_halves() {
        let classify = |y| classify_drop(ROW, at(10, y), DragAxis::Vertical, false);
        assert_eq!(classify(119), DropOperation::ReorderBefore);
        assert_eq!(classify(120), DropOperation::ReorderAfter);
    }

    #[test]
    fn tab_headers_use_horizontal_axis() {
        let tab = TargetRect {
            x: 50,
            y: 0,
            width: 100,
            height: 30,
        };
        assert_eq!(
            classify_drop(tab, at(60, 29), DragAxis::Horizontal, false),
            DropOperation::ReorderBefore
        );
        assert_eq!(
            classify_drop(tab, at(140, 0), DragAxis::Horizontal, false),
            DropOperation::ReorderAfter
        );
    }

    #[test]
    fn outside_pointer_clamps_to_nearest_edge() {
        assert_eq!(
            classify_drop(ROW, at(0, 50), DragAxis::Vertical, true),
            DropOperation::ReorderBefore
        );
        assert_eq!(
            classify_drop(ROW, at(0, 500), DragAxis::Vertical, true),
            DropOperation::ReorderAfter
        );
        assert!(!ROW.contains(at(0, 140)));
        assert!(ROW.contains(at(199, 139)));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        assert_eq!(
            classify_drop(ROW, at(0, i32::MIN), DragAxis::Vertical, true),
            DropOperation::ReorderBefore
        );
        assert_eq!(
            classify_drop(ROW, at(0, i32::MAX), DragAxis::Vertical, true),
            DropOperation::ReorderAfter
        );

        let huge = TargetRect {
            x: i32::MIN,
            y: i32::MIN,
            width: i32::MAX,
            height: i32::MAX,
        };
        assert_eq!(
            classify_drop(huge, at(0, 0), DragAxis::Horizontal, true),
            DropOperation::ReorderAfter
        );
        assert_eq!(
            classify_drop(huge, at(0, 0), DragAxis::Vertical, false),
            DropOperation::ReorderAfter
        );
        assert!(huge.contains(at(i32::MIN, -2)));
        assert!(!huge.contains(at(0, 0)));
        assert!(!ROW.contains(at(i32::MAX, i32::MAX)));
    }
}
