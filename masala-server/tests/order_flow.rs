//! End-to-end order flow over the embedded database
//!
//! Exercises checkout, the status lattice, the item auto-advance rule,
//! partial completion and inventory deduction against a real RocksDB
//! instance in a temp directory.

use tempfile::TempDir;

use masala_server::db::DbService;
use masala_server::db::models::{InventoryItemCreate, MenuItemCreate};
use masala_server::db::repository::{
    InventoryRepository, MenuRepository, OrderRepository, SessionRepository,
};
use masala_server::inventory::deduct_for_order;
use masala_server::utils::AppError;
use shared::cart::CartItem;
use shared::menu::MenuItemRequirement;
use shared::order::{ItemStatus, OrderStatus, PaymentStatus};

async fn open_db() -> (TempDir, DbService) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("test.db");
    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("open db");
    (dir, db)
}

fn cart_line(id: &str, name: &str, price: f64, quantity: i32) -> CartItem {
    CartItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        quantity,
        category: None,
    }
}

#[tokio::test]
async fn checkout_computes_totals() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());

    let order = orders
        .create_from_cart(
            "Asha".to_string(),
            Some("9876500000".to_string()),
            &[
                cart_line("menu_item:a", "Butter Chicken", 150.0, 2),
                cart_line("menu_item:b", "Garlic Naan", 80.0, 1),
            ],
        )
        .await
        .expect("checkout");

    assert_eq!(order.total_amount, 380.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].total_price, 300.0);
    assert_eq!(order.items[1].total_price, 80.0);
    assert!(order.items.iter().all(|i| i.item_status == ItemStatus::Pending));
    assert!(order.items.iter().all(|i| i.completed_quantity == 0));

    // Listed newest first
    let all = orders.find_all().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, order.id);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());
    let result = orders.create_from_cart("Asha".to_string(), None, &[]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn status_transitions_are_gated() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());
    let order = orders
        .create_from_cart(
            "Ravi".to_string(),
            None,
            &[cart_line("menu_item:a", "Dal Makhani", 180.0, 1)],
        )
        .await
        .expect("checkout");

    // Forward moves succeed
    let order2 = orders
        .update_status(&order.id, OrderStatus::Confirmed)
        .await
        .expect("confirm");
    assert_eq!(order2.status, OrderStatus::Confirmed);

    // Backwards is rejected
    assert!(
        orders
            .update_status(&order.id, OrderStatus::Pending)
            .await
            .is_err()
    );

    // Cancel from non-terminal stamps reason + timestamp
    let cancelled = orders
        .cancel(&order.id, Some("customer left".to_string()))
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("customer left"));
    assert!(cancelled.cancelled_at.is_some());

    // Cancelled is terminal
    assert!(orders.cancel(&order.id, None).await.is_err());
    assert!(
        orders
            .update_status(&order.id, OrderStatus::Ready)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn all_items_done_advances_order_exactly_once() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());
    let order = orders
        .create_from_cart(
            "Meera".to_string(),
            None,
            &[
                cart_line("menu_item:a", "Biryani", 220.0, 1),
                cart_line("menu_item:b", "Raita", 60.0, 1),
            ],
        )
        .await
        .expect("checkout");

    orders
        .update_status(&order.id, OrderStatus::Confirmed)
        .await
        .expect("confirm");
    orders
        .update_status(&order.id, OrderStatus::Preparing)
        .await
        .expect("prepare");

    // First item done: no advance yet
    let (after_first, advanced) = orders
        .update_item_status(&order.id, &order.items[0].id, ItemStatus::Ready)
        .await
        .expect("item ready");
    assert!(!advanced);
    assert_eq!(after_first.status, OrderStatus::Preparing);

    // Second item done: advance fires
    let (after_second, advanced) = orders
        .update_item_status(&order.id, &order.items[1].id, ItemStatus::Completed)
        .await
        .expect("item completed");
    assert!(advanced);
    assert_eq!(after_second.status, OrderStatus::Ready);

    // Touching an item again must not advance a second time
    let (after_third, advanced) = orders
        .update_item_status(&order.id, &order.items[0].id, ItemStatus::Completed)
        .await
        .expect("item completed again");
    assert!(!advanced);
    assert_eq!(after_third.status, OrderStatus::Ready);
}

#[tokio::test]
async fn completed_quantity_is_clamped_and_promotes() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());
    let order = orders
        .create_from_cart(
            "Zoya".to_string(),
            None,
            &[cart_line("menu_item:a", "Masala Chai", 40.0, 2)],
        )
        .await
        .expect("checkout");
    let item_id = order.items[0].id.clone();

    let (after_one, _) = orders
        .complete_item_unit(&order.id, &item_id)
        .await
        .expect("first unit");
    assert_eq!(after_one.items[0].completed_quantity, 1);
    assert_ne!(after_one.items[0].item_status, ItemStatus::Completed);

    let (after_two, _) = orders
        .complete_item_unit(&order.id, &item_id)
        .await
        .expect("second unit");
    assert_eq!(after_two.items[0].completed_quantity, 2);
    assert_eq!(after_two.items[0].item_status, ItemStatus::Completed);

    // Never past quantity
    assert!(orders.complete_item_unit(&order.id, &item_id).await.is_err());
}

#[tokio::test]
async fn deduction_is_all_or_nothing() {
    let (_dir, db) = open_db().await;
    let orders = OrderRepository::new(db.db.clone());
    let menu = MenuRepository::new(db.db.clone());
    let inventory = InventoryRepository::new(db.db.clone());

    let rice = inventory
        .create(InventoryItemCreate {
            name: "Basmati Rice".to_string(),
            unit: "kg".to_string(),
            current_stock: 10.0,
            minimum_stock: 2.0,
            cost_per_unit: 90.0,
        })
        .await
        .expect("rice");
    let saffron = inventory
        .create(InventoryItemCreate {
            name: "Saffron".to_string(),
            unit: "g".to_string(),
            current_stock: 1.0,
            minimum_stock: 5.0,
            cost_per_unit: 300.0,
        })
        .await
        .expect("saffron");

    let biryani = menu
        .create(MenuItemCreate {
            name: "Biryani".to_string(),
            description: None,
            price: 220.0,
            category_id: None,
            image_url: None,
            is_available: true,
        })
        .await
        .expect("menu item");

    menu.set_requirements(
        &biryani.id,
        vec![
            MenuItemRequirement {
                inventory_item_id: rice.id.clone(),
                quantity_required: 0.5,
            },
            MenuItemRequirement {
                inventory_item_id: saffron.id.clone(),
                quantity_required: 2.0,
            },
        ],
    )
    .await
    .expect("requirements");

    let order = orders
        .create_from_cart(
            "Asha".to_string(),
            None,
            &[cart_line(&biryani.id, "Biryani", 220.0, 2)],
        )
        .await
        .expect("checkout");

    // Saffron needs 4.0 but only 1.0 in stock: full shortfall report,
    // nothing deducted
    let err = deduct_for_order(db.db.clone(), &order.id)
        .await
        .expect_err("must reject");
    match err {
        AppError::InsufficientStock(shortfalls) => {
            assert_eq!(shortfalls.len(), 1);
            assert_eq!(shortfalls[0].name, "Saffron");
            assert_eq!(shortfalls[0].required, 4.0);
            assert_eq!(shortfalls[0].available, 1.0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    let rice_after = inventory.find_by_id(&rice.id).await.unwrap().unwrap();
    assert_eq!(rice_after.current_stock, 10.0);

    // Restock saffron, then the whole deduction applies
    inventory.restock(&saffron.id, 10.0).await.expect("restock");
    let deductions = deduct_for_order(db.db.clone(), &order.id)
        .await
        .expect("deduct");
    assert_eq!(deductions.len(), 2);

    let rice_after = inventory.find_by_id(&rice.id).await.unwrap().unwrap();
    assert!((rice_after.current_stock - 9.0).abs() < 1e-9);
    let saffron_after = inventory.find_by_id(&saffron.id).await.unwrap().unwrap();
    assert!((saffron_after.current_stock - 7.0).abs() < 1e-9);
}

#[tokio::test]
async fn sessions_validate_and_expire() {
    let (_dir, db) = open_db().await;
    let sessions = SessionRepository::new(db.db.clone());

    let session = sessions.create("user:u1", 24).await.expect("create");
    let found = sessions
        .find_valid(&session.token)
        .await
        .expect("lookup")
        .expect("valid");
    assert_eq!(found.user_id, "user:u1");

    // Zero TTL is already expired
    let stale = sessions.create("user:u1", 0).await.expect("create stale");
    assert!(sessions.find_valid(&stale.token).await.expect("lookup").is_none());

    // Logout drops the session
    sessions.delete(&session.token).await.expect("delete");
    assert!(
        sessions
            .find_valid(&session.token)
            .await
            .expect("lookup")
            .is_none()
    );
}
