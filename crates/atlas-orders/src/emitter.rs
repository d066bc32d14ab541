//! # Invoice Emitter
//!
//! One-way side effect of order completion: creates the immutable invoice
//! record referencing a completed order. There is no update or cancellation
//! path; the unique index in the store makes a duplicate emission fail.

use tracing::info;

use atlas_db::{Database, DbResult, InvoiceRepository};

/// Emits invoices for completed sale orders.
#[derive(Debug, Clone)]
pub struct InvoiceEmitter {
    invoices: InvoiceRepository,
}

impl InvoiceEmitter {
    /// Creates a new emitter over the given database.
    pub fn new(db: &Database) -> Self {
        InvoiceEmitter {
            invoices: db.invoices(),
        }
    }

    /// Creates the invoice for `sale_order_id` and returns its id.
    ///
    /// Called by the lifecycle service after the completion flip has been
    /// persisted; a failure here is the caller's to log, not to roll back.
    pub async fn emit(&self, sale_order_id: &str) -> DbResult<String> {
        let invoice = self.invoices.create(sale_order_id).await?;

        info!(
            invoice_id = %invoice.id,
            sale_order_id = %sale_order_id,
            "invoice emitted"
        );

        Ok(invoice.id)
    }
}
