use crate::store::{derived, derived3, Derived, ReadHandle, Store};

// ---------------------------------------------------------------------------
// FilterStore – reactive filter state for the viewer
// ---------------------------------------------------------------------------

/// Reactive filter state for one viewer session, generic over the record
/// type `R` and the filter-criterion type `F`.
///
/// Holds the complete record collection, the currently filtered view, the
/// active criteria, and two flags: whether filters are applied and whether
/// the filter panel is open. Two cells are derived from those:
///
/// * `has_active_filters` – true iff any criterion is active;
/// * `effective_records` – what the rendering layer should draw: the
///   filtered view when filters are applied and it is non-empty, the
///   complete collection otherwise.
///
/// All cells are exposed as read-only handles; mutation goes through the
/// methods below. Updates within one call land on the individual cells
/// sequentially, so a subscriber of a single cell can observe an
/// intermediate combination; `effective_records` settles once the call
/// returns.
pub struct FilterStore<R, F> {
    all_records: Store<Vec<R>>,
    filtered_records: Store<Vec<R>>,
    active_filters: Store<Vec<F>>,
    filters_applied: Store<bool>,
    panel_expanded: Store<bool>,
    has_active_filters: Derived<bool>,
    effective_records: Derived<Vec<R>>,
}

impl<R, F> FilterStore<R, F>
where
    R: Clone + 'static,
    F: Clone + 'static,
{
    /// Create a store with empty collections, no criteria, and the filter
    /// panel closed.
    pub fn new() -> Self {
        let all_records = Store::new(Vec::new());
        let filtered_records = Store::new(Vec::new());
        let active_filters = Store::new(Vec::new());
        let filters_applied = Store::new(false);
        let panel_expanded = Store::new(false);

        let has_active_filters = derived(&active_filters, |filters: &Vec<F>| !filters.is_empty());
        let effective_records = derived3(
            &filtered_records,
            &all_records,
            &filters_applied,
            |filtered: &Vec<R>, all: &Vec<R>, applied: &bool| {
                if *applied && !filtered.is_empty() {
                    filtered.clone()
                } else {
                    all.clone()
                }
            },
        );

        Self {
            all_records,
            filtered_records,
            active_filters,
            filters_applied,
            panel_expanded,
            has_active_filters,
            effective_records,
        }
    }

    // ---- mutation path ----

    /// Replace the complete record collection. Called by the loading code
    /// after the user picks a dataset. Leaves the filtered view and the
    /// active criteria alone; `effective_records` already falls back to the
    /// complete collection until filters are applied.
    pub fn set_all_records(&self, records: Vec<R>) {
        log::debug!("complete collection replaced: {} records", records.len());
        self.all_records.set(records);
    }

    /// Replace the filtered view and the active criteria. The records are
    /// taken as-is; nothing checks that they form a subset of the complete
    /// collection. Filters count as applied exactly when `filters` is
    /// non-empty.
    pub fn update_filtered(&self, records: Vec<R>, filters: Vec<F>) {
        log::debug!(
            "filtered view replaced: {} records under {} criteria",
            records.len(),
            filters.len()
        );
        let applied = !filters.is_empty();
        self.filtered_records.set(records);
        self.active_filters.set(filters);
        self.filters_applied.set(applied);
    }

    /// Drop all criteria and restore the filtered view to the complete
    /// collection. The filter panel's open state is left alone.
    pub fn reset_filters(&self) {
        log::debug!("filters reset");
        self.filtered_records.set(self.all_records.get());
        self.active_filters.set(Vec::new());
        self.filters_applied.set(false);
    }

    /// Open or close the filter panel. Independent of whether filters are
    /// applied: closing the panel never changes `effective_records`.
    pub fn set_panel_expanded(&self, expanded: bool) {
        self.panel_expanded.set(expanded);
    }

    /// Flip the filter panel's open state.
    pub fn toggle_panel(&self) {
        self.panel_expanded.update(|open| *open = !*open);
    }

    // ---- read-only cell handles ----

    /// The complete record collection.
    pub fn all_records(&self) -> ReadHandle<Vec<R>> {
        self.all_records.reader()
    }

    /// The currently filtered view.
    pub fn filtered_records(&self) -> ReadHandle<Vec<R>> {
        self.filtered_records.reader()
    }

    /// The active filter criteria.
    pub fn active_filters(&self) -> ReadHandle<Vec<F>> {
        self.active_filters.reader()
    }

    /// Whether filters are currently applied.
    pub fn filters_applied(&self) -> ReadHandle<bool> {
        self.filters_applied.reader()
    }

    /// Whether the filter panel is open.
    pub fn panel_expanded(&self) -> ReadHandle<bool> {
        self.panel_expanded.reader()
    }

    /// True iff any filter criterion is active.
    pub fn has_active_filters(&self) -> ReadHandle<bool> {
        self.has_active_filters.reader()
    }

    /// The records the rendering layer should draw.
    pub fn effective_records(&self) -> ReadHandle<Vec<R>> {
        self.effective_records.reader()
    }
}

impl<R, F> Default for FilterStore<R, F>
where
    R: Clone + 'static,
    F: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
