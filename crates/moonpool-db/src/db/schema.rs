diesel::table! {
    app_user (id) {
        id -> Uuid,
        email -> Text,
        display_name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    operation (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        operation_date -> Date,
        start_time -> Nullable<Time>,
        end_time -> Nullable<Time>,
        location -> Nullable<Text>,
        operation_type -> Text,
        status -> Text,
        color -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    share_link (id) {
        id -> Uuid,
        owner_id -> Uuid,
        token -> Text,
        is_public -> Bool,
        expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    sync_account (id) {
        id -> Uuid,
        owner_id -> Uuid,
        provider -> Text,
        direction -> Text,
        refresh_token -> Nullable<Text>,
        last_synced_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    sync_mapping (id) {
        id -> Uuid,
        account_id -> Uuid,
        operation_id -> Uuid,
        external_event_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(operation -> app_user (owner_id));
diesel::joinable!(share_link -> app_user (owner_id));
diesel::joinable!(sync_account -> app_user (owner_id));
diesel::joinable!(sync_mapping -> sync_account (account_id));
diesel::joinable!(sync_mapping -> operation (operation_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    operation,
    share_link,
    sync_account,
    sync_mapping,
);
