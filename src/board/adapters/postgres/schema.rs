//! Diesel schema for board persistence.

diesel::table! {
    /// Kanban columns, one set per tenant.
    board_columns (id) {
        /// Column identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Display color in `#rrggbb` form.
        #[max_length = 7]
        color -> Varchar,
        /// Zero-based ordering index.
        ordinal -> Int4,
        /// Optional work-in-progress limit.
        wip_limit -> Nullable<Int4>,
        /// Whether cards in the column count as completed.
        is_terminal -> Bool,
        /// Monotonic version for stale-move detection.
        version -> Int8,
    }
}

diesel::table! {
    /// Kanban cards.
    board_cards (id) {
        /// Card identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Column holding the card.
        column_id -> Uuid,
        /// Card title.
        title -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Priority keyword.
        #[max_length = 20]
        priority -> Varchar,
        /// Zero-based position inside the column.
        position -> Int4,
        /// Optional due timestamp.
        due_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
