mod ical;
mod operations;
mod share_links;
mod sync;

use salvo::Router;

use moonpool_core::constants::CALENDAR_ROUTE_COMPONENT;

/// ## Summary
/// Constructs the operations-calendar router.
///
/// Static segments (share-links, export, import, sync, providers) are
/// registered before the `<id>` wildcard so they are never shadowed.
#[must_use]
pub fn routes() -> Router {
    let mut router = Router::with_path(CALENDAR_ROUTE_COMPONENT)
        .get(operations::list_operations)
        .post(operations::create_operation)
        .push(share_links::routes())
        .push(ical::export_routes())
        .push(ical::import_routes());

    for sync_router in sync::routes() {
        router = router.push(sync_router);
    }

    router.push(
        Router::with_path("<id>")
            .get(operations::get_operation)
            .put(operations::update_operation)
            .delete(operations::delete_operation),
    )
}
