use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use pizzeria_billing::{
    Checkout, CustomerDetails, Invoice, PaymentStatus, Receipt, TenderError, parse_tendered,
};
use pizzeria_cart::{Cart, CartRepository, MergeOutcome, SelectionSheet, StoreError};
use pizzeria_catalog::{Catalog, CatalogItem};
use pizzeria_core::{Category, DomainError, InvoiceNumber, ItemId, Money, SaleId};

use crate::printer::PrintError;

#[derive(Debug, thiserror::Error)]
pub enum PosError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("cart storage failed: {0}")]
    Store(#[from] StoreError),
    #[error("invalid amount: {0}")]
    Tender(#[from] TenderError),
    #[error("printing failed: {0}")]
    Print(#[from] PrintError),
}

/// One counter session: the menu snapshot, the persisted cart and the
/// payment state of the sale in progress.
///
/// Assumes a single serial caller.
pub struct PosSession<R> {
    repository: R,
    catalog: Catalog,
    cart: Cart,
    sheets: BTreeMap<Category, SelectionSheet>,
    customer: CustomerDetails,
    tendered: Money,
    checkout: Checkout,
    invoice_number: InvoiceNumber,
}

impl<R: CartRepository> PosSession<R> {
    /// Start a session, restoring whatever cart the repository holds.
    pub fn new(repository: R, catalog: Catalog) -> Self {
        let cart = repository.load();
        tracing::info!(
            lines = cart.len(),
            items = catalog.len(),
            "pos session started"
        );
        Self {
            repository,
            catalog,
            cart,
            sheets: fresh_sheets(),
            customer: CustomerDetails::default(),
            tendered: Money::ZERO,
            checkout: Checkout::new(SaleId::new()),
            invoice_number: InvoiceNumber::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn sheet(&self, category: Category) -> Option<&SelectionSheet> {
        self.sheets.get(&category)
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn tendered(&self) -> Money {
        self.tendered
    }

    pub fn status(&self) -> PaymentStatus {
        self.checkout.status()
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn invoice_number(&self) -> InvoiceNumber {
        self.invoice_number
    }

    /// Tick a catalog item on its category sheet, optionally with a quantity.
    pub fn pick(
        &mut self,
        category: Category,
        id: ItemId,
        quantity: Option<u32>,
    ) -> Result<(), PosError> {
        self.ensure_editable()?;
        let item = find_item(&self.catalog, category, id)?.clone();
        let sheet = sheet_mut(&mut self.sheets, category);

        let was_checked = sheet.is_checked(id);
        sheet.check(&item)?;
        if let Some(quantity) = quantity {
            if let Err(err) = sheet.set_quantity(id, quantity) {
                if !was_checked {
                    sheet.uncheck(id);
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Untick an item; returns whether it was ticked.
    pub fn unpick(&mut self, category: Category, id: ItemId) -> Result<bool, PosError> {
        self.ensure_editable()?;
        Ok(sheet_mut(&mut self.sheets, category).uncheck(id))
    }

    /// Merge the ticked items of `category` into the cart and persist it.
    ///
    /// The in-memory cart only changes once the save succeeded; the sheet is
    /// cleared afterwards.
    pub fn add_selected(&mut self, category: Category) -> Result<MergeOutcome, PosError> {
        self.ensure_editable()?;
        let sheet = sheet_mut(&mut self.sheets, category);
        let selections = sheet.selections(self.catalog.items(category));
        if selections.is_empty() {
            return Err(DomainError::validation(format!("no {category} items selected")).into());
        }

        let mut next = self.cart.clone();
        let outcome = next.merge_in_place(&selections);
        self.repository.save(&next)?;
        self.cart = next;
        sheet.clear();

        tracing::debug!(
            %category,
            appended = outcome.appended,
            incremented = outcome.incremented,
            skipped = outcome.skipped,
            "selections added to cart"
        );
        Ok(outcome)
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer.set_name(name);
    }

    pub fn set_telephone(&mut self, telephone: impl Into<String>) {
        self.customer.set_telephone(telephone);
    }

    /// Parse and record the amount handed over by the customer.
    pub fn set_tendered(&mut self, text: &str) -> Result<Money, PosError> {
        self.ensure_editable()?;
        let amount = parse_tendered(text)?;
        self.tendered = amount;
        Ok(amount)
    }

    /// Invoice of the current cart against the tendered amount.
    pub fn invoice(&self) -> Result<Invoice, PosError> {
        Ok(Invoice::compute(&self.cart, self.tendered)?)
    }

    /// Confirm payment. The tendered amount is checked against the invoice
    /// as it stands now; confirming twice succeeds without changes.
    pub fn confirm(&mut self, at: DateTime<Utc>) -> Result<PaymentStatus, PosError> {
        if !self.checkout.is_confirmed() && self.cart.is_empty() {
            return Err(DomainError::validation("cannot confirm payment for an empty cart").into());
        }
        let invoice = self.invoice()?;
        let was_confirmed = self.checkout.is_confirmed();
        match self.checkout.confirm(&invoice, at) {
            Ok(status) => {
                if let (false, Some(confirmed)) = (was_confirmed, self.checkout.confirmation()) {
                    tracing::info!(
                        sale_id = %confirmed.sale_id,
                        total = %confirmed.total,
                        paid = %confirmed.amount_paid,
                        "payment confirmed"
                    );
                }
                Ok(status)
            }
            Err(err) => {
                tracing::info!(error = %err, "payment confirmation rejected");
                Err(err.into())
            }
        }
    }

    /// Printable receipt of the confirmed sale.
    pub fn receipt(&self, printed_at: DateTime<Utc>) -> Result<Receipt, PosError> {
        let invoice = self.invoice()?;
        Ok(Receipt::prepare(
            &invoice,
            &self.checkout,
            &self.customer,
            self.invoice_number,
            printed_at,
        )?)
    }

    /// Clear the persisted cart and start a new sale.
    pub fn new_sale(&mut self) -> Result<(), PosError> {
        self.repository.clear()?;
        let finished = self.checkout.id_typed();

        self.cart = Cart::new();
        self.sheets = fresh_sheets();
        self.customer = CustomerDetails::default();
        self.tendered = Money::ZERO;
        self.checkout = Checkout::new(SaleId::new());
        self.invoice_number = InvoiceNumber::new();

        tracing::info!(previous_sale = %finished, sale = %self.checkout.id_typed(), "new sale started");
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.checkout.is_confirmed() {
            return Err(DomainError::validation(
                "sale is already paid; start a new sale to make changes",
            ));
        }
        Ok(())
    }
}

fn fresh_sheets() -> BTreeMap<Category, SelectionSheet> {
    Category::ALL
        .into_iter()
        .map(|c| (c, SelectionSheet::new(c)))
        .collect()
}

fn sheet_mut(
    sheets: &mut BTreeMap<Category, SelectionSheet>,
    category: Category,
) -> &mut SelectionSheet {
    sheets
        .entry(category)
        .or_insert_with(|| SelectionSheet::new(category))
}

fn find_item(catalog: &Catalog, category: Category, id: ItemId) -> Result<&CatalogItem, DomainError> {
    catalog
        .find(category, id)
        .ok_or_else(|| DomainError::not_found(format!("{category} #{id} is not on the menu")))
}
