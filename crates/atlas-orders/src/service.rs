//! # Order Lifecycle Service
//!
//! The single entry point for sale-order mutation. Every operation takes the
//! verified [`Principal`] explicitly and returns either the stored order or a
//! typed rejection; transport, schema validation and credential parsing all
//! happen before this layer.
//!
//! ## Line processing is sequential by design
//!
//! Within one request, lines are reserved strictly in request order, so the
//! stock check for a later line observes the reservations of earlier lines
//! in the same request. Parallel fan-out here would let one request oversell
//! against itself.

use tracing::{info, warn};

use atlas_core::order::{self, line_cost};
use atlas_core::validation::{validate_entity_id, validate_order_lines};
use atlas_core::{LineItem, Money, NewSaleOrder, OrderStatus, Principal, SaleOrder};
use atlas_db::{
    Database, DbError, ProductRepository, ReserveOutcome, SaleOrderRepository,
};

use crate::emitter::InvoiceEmitter;
use crate::error::{OrderError, OrderResult};

/// Orchestrates creation, line mutation, completion and cancellation of
/// sale orders.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    emitter: InvoiceEmitter,
}

impl OrderService {
    /// Creates a new OrderService over the given database.
    pub fn new(db: Database) -> Self {
        let emitter = InvoiceEmitter::new(&db);
        OrderService { db, emitter }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates a new pending order for `company_id` with the requested lines.
    ///
    /// Each line is resolved, tenant-checked and reserved in request order;
    /// the total accumulates at the price observed when the line was
    /// reserved. On success the order is persisted once, which assigns its
    /// business numbers.
    ///
    /// A failure on a later line does NOT return the stock reserved for
    /// earlier lines (see the crate docs).
    pub async fn create_order(
        &self,
        principal: &Principal,
        company_id: &str,
        lines: &[LineItem],
    ) -> OrderResult<SaleOrder> {
        let user_id = principal
            .user_id()
            .ok_or_else(|| OrderError::Unauthorized("authentication required".to_string()))?
            .to_string();

        validate_entity_id("companyId", company_id)?;
        validate_order_lines(lines)?;

        if !principal.is_same_company(company_id) {
            return Err(OrderError::Unauthorized(
                "you are not allowed to create an order for this company".to_string(),
            ));
        }

        let company = self.db.companies().get_by_id(company_id).await?;
        if company.is_none() {
            return Err(OrderError::NotFound {
                entity: "Company",
                id: company_id.to_string(),
            });
        }

        let mut order_lines: Vec<LineItem> = Vec::with_capacity(lines.len());
        let mut total = Money::zero();

        for line in lines {
            total += self.reserve_line(company_id, line).await?;
            order::append_line(&mut order_lines, line.product_id.clone(), line.quantity);
        }

        let order = self
            .db
            .sale_orders()
            .insert(&NewSaleOrder {
                user_id,
                company_id: company_id.to_string(),
                status: OrderStatus::Pending,
                line_items: order_lines,
                total_cents: total.cents(),
            })
            .await?;

        info!(
            order_id = %order.id,
            sale_order_number = %order.sale_order_number,
            company_id = %company_id,
            lines = order.line_items.len(),
            total = %order.total(),
            "order created"
        );

        Ok(order)
    }

    // =========================================================================
    // Add Lines
    // =========================================================================

    /// Appends lines to a pending order.
    ///
    /// Lines are reserved exactly as in [`OrderService::create_order`] and
    /// appended as new entries - a product already on the order gets a second
    /// entry, not a merged quantity. The total grows by the cost of the
    /// appended lines.
    pub async fn add_order_lines(
        &self,
        principal: &Principal,
        order_id: &str,
        lines: &[LineItem],
    ) -> OrderResult<SaleOrder> {
        validate_entity_id("orderId", order_id)?;
        validate_order_lines(lines)?;

        let order = self.fetch_order(order_id).await?;
        self.ensure_may_update(principal, &order)?;
        ensure_pending(&order)?;

        let mut total = order.total();
        let mut order_lines = order.line_items;

        for line in lines {
            total += self.reserve_line(&order.company_id, line).await?;
            order::append_line(&mut order_lines, line.product_id.clone(), line.quantity);
        }

        self.persist_lines(order_id, &order_lines, total).await?;

        info!(
            order_id = %order_id,
            added = lines.len(),
            total = %total,
            "order lines added"
        );

        self.fetch_order(order_id).await
    }

    // =========================================================================
    // Revise Line Quantities
    // =========================================================================

    /// Revises the quantities of existing lines, atomically.
    ///
    /// For each requested line matching an existing entry (first match by
    /// product id), the stock delta `old - new` is applied to the ledger and
    /// the total adjusted by `price * delta`. Requested products with no
    /// matching line are skipped.
    ///
    /// The whole revision runs inside one transaction: either every stock
    /// adjustment and the order update commit together, or none do. No other
    /// reader can observe a partially revised order.
    pub async fn revise_order_lines(
        &self,
        principal: &Principal,
        order_id: &str,
        lines: &[LineItem],
    ) -> OrderResult<SaleOrder> {
        validate_entity_id("orderId", order_id)?;
        validate_order_lines(lines)?;

        let order = self.fetch_order(order_id).await?;
        self.ensure_may_update(principal, &order)?;
        ensure_pending(&order)?;

        let mut total = order.total();
        let mut order_lines = order.line_items;

        // Everything below either commits as a unit or rolls back when the
        // transaction is dropped on the error path.
        let mut tx = self.db.begin().await?;

        for requested in lines {
            let Some(line) = order::find_line_mut(&mut order_lines, &requested.product_id)
            else {
                continue;
            };

            let product = ProductRepository::get_by_id_on(&mut *tx, &requested.product_id)
                .await?
                .ok_or_else(|| OrderError::NotFound {
                    entity: "Product",
                    id: requested.product_id.clone(),
                })?;

            // Positive delta returns stock; negative delta consumes more.
            let delta = line.quantity - requested.quantity;

            if -delta > product.quantity {
                return Err(OrderError::OutOfStock { name: product.name });
            }

            ProductRepository::release_on(&mut *tx, &requested.product_id, delta).await?;

            total -= line_cost(product.selling_price(), delta);
            line.quantity = requested.quantity;
        }

        match SaleOrderRepository::update_lines_on(&mut *tx, order_id, &order_lines, total.cents())
            .await
        {
            Ok(()) => {}
            // The order was finalized while we were revising; the predicate
            // matched nothing, so nothing may commit.
            Err(DbError::NotFound { .. }) => return Err(OrderError::OrderAlreadyFinalized),
            Err(err) => return Err(err.into()),
        }

        tx.commit()
            .await
            .map_err(|e| OrderError::Internal(DbError::TransactionFailed(e.to_string())))?;

        info!(
            order_id = %order_id,
            revised = lines.len(),
            total = %total,
            "order lines revised"
        );

        self.fetch_order(order_id).await
    }

    // =========================================================================
    // Complete
    // =========================================================================

    /// Completes an order and emits its invoice.
    ///
    /// The status flip is a conditional update, so of two concurrent
    /// completions exactly one wins. Invoice emission happens after the flip
    /// and is fire-and-forget: an emission failure is logged and surfaced
    /// via tracing but does not revert the completed status.
    pub async fn complete_order(
        &self,
        principal: &Principal,
        order_id: &str,
    ) -> OrderResult<SaleOrder> {
        validate_entity_id("orderId", order_id)?;

        let order = self.fetch_order(order_id).await?;

        if !principal.is_same_company(&order.company_id) {
            return Err(OrderError::Unauthorized(
                "you are not allowed to place an order for this company".to_string(),
            ));
        }

        if order.status == OrderStatus::Completed {
            return Err(OrderError::OrderAlreadyFinalized);
        }

        let flipped = self.db.sale_orders().complete(order_id).await?;
        if !flipped {
            // Lost a race with a concurrent completion.
            return Err(OrderError::OrderAlreadyFinalized);
        }

        if let Err(err) = self.emitter.emit(order_id).await {
            warn!(
                order_id = %order_id,
                error = %err,
                "invoice emission failed; order stays completed"
            );
        }

        info!(order_id = %order_id, "order completed");

        self.fetch_order(order_id).await
    }

    // =========================================================================
    // Cancel
    // =========================================================================

    /// Cancels a pending order.
    ///
    /// Makes the declared `cancelled` state reachable. Deliberately does NOT
    /// restore reserved stock: cancellation semantics beyond the status
    /// transition are unspecified, and inventing them here would be guessing.
    pub async fn cancel_order(
        &self,
        principal: &Principal,
        order_id: &str,
    ) -> OrderResult<SaleOrder> {
        validate_entity_id("orderId", order_id)?;

        let order = self.fetch_order(order_id).await?;
        self.ensure_may_update(principal, &order)?;
        ensure_pending(&order)?;

        let flipped = self.db.sale_orders().cancel(order_id).await?;
        if !flipped {
            // Lost a race; report what the order became.
            let current = self.fetch_order(order_id).await?;
            return Err(match current.status {
                OrderStatus::Completed => OrderError::OrderAlreadyFinalized,
                _ => OrderError::OrderCancelled,
            });
        }

        info!(order_id = %order_id, "order cancelled");

        self.fetch_order(order_id).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolves, tenant-checks and reserves one requested line; returns its
    /// cost at the price observed at reservation time.
    async fn reserve_line(&self, company_id: &str, line: &LineItem) -> OrderResult<Money> {
        let product = self
            .db
            .products()
            .get_by_id(&line.product_id)
            .await?
            .ok_or_else(|| OrderError::NotFound {
                entity: "Product",
                id: line.product_id.clone(),
            })?;

        if product.company_id != company_id {
            return Err(OrderError::CrossTenantProduct {
                product_id: line.product_id.clone(),
            });
        }

        // Advisory read for a product-specific message; the conditional
        // decrement below is the authoritative check.
        if !product.has_stock_for(line.quantity) {
            return Err(OrderError::OutOfStock { name: product.name });
        }

        match self
            .db
            .products()
            .try_reserve(&line.product_id, line.quantity)
            .await?
        {
            ReserveOutcome::Reserved => Ok(line_cost(product.selling_price(), line.quantity)),
            ReserveOutcome::InsufficientStock => {
                Err(OrderError::OutOfStock { name: product.name })
            }
        }
    }

    /// Persists new lines/total, mapping the pending-only predicate miss to
    /// the state-machine rejection it implies.
    async fn persist_lines(
        &self,
        order_id: &str,
        lines: &[LineItem],
        total: Money,
    ) -> OrderResult<()> {
        match self
            .db
            .sale_orders()
            .update_lines(order_id, lines, total.cents())
            .await
        {
            Ok(()) => Ok(()),
            Err(DbError::NotFound { .. }) => Err(OrderError::OrderAlreadyFinalized),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads an order or rejects with NotFound.
    async fn fetch_order(&self, order_id: &str) -> OrderResult<SaleOrder> {
        self.db
            .sale_orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound {
                entity: "Order",
                id: order_id.to_string(),
            })
    }

    /// Tenant guard for mutations of an existing order.
    fn ensure_may_update(&self, principal: &Principal, order: &SaleOrder) -> OrderResult<()> {
        if principal.is_same_company(&order.company_id) {
            Ok(())
        } else {
            Err(OrderError::Unauthorized(
                "you are not allowed to update this order".to_string(),
            ))
        }
    }
}

/// State-machine guard for line mutation and cancellation.
fn ensure_pending(order: &SaleOrder) -> OrderResult<()> {
    match order.status {
        OrderStatus::Pending => Ok(()),
        OrderStatus::Completed => Err(OrderError::OrderAlreadyFinalized),
        OrderStatus::Cancelled => Err(OrderError::OrderCancelled),
    }
}
