/// Bounding rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// One range of the platform's native text selection.
pub trait NativeRange: Clone {
    /// Move the start boundary to `offset` within the current start container.
    fn set_start_in_container(&mut self, offset: usize);

    /// Layout rectangle covering the range.
    fn bounding_rect(&self) -> Rect;
}

/// The platform's live text selection, as laid out on screen.
pub trait NativeSelection {
    type Range: NativeRange;

    fn range_count(&self) -> usize;

    fn range_at(&self, index: usize) -> Option<&Self::Range>;
}

/// Measure the native selection, optionally narrowed to begin `start_offset`
/// chars into its start container.
///
/// Works on a clone of the first range; the live selection is never touched.
/// Returns `None` when there is no native selection to measure.
pub fn compute_rect<N: NativeSelection + ?Sized>(
    selection: &N,
    start_offset: Option<usize>,
) -> Option<Rect> {
    if selection.range_count() == 0 {
        return None;
    }

    let mut range = selection.range_at(0)?.clone();
    if let Some(offset) = start_offset {
        range.set_start_in_container(offset);
    }

    Some(range.bounding_rect())
}
