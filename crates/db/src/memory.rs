//! In-process implementation of the persistence port.
//!
//! Each employee owns one `EmployeeLedger`. Every write for an employee
//! happens while holding that ledger's map entry, so the writes that must
//! land together (recap + balance update + TOIL credit, leave status + balance
//! mutation) are applied in one step or not at all.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};

use accrual_core::leave::{
    BalanceMutation, LeaveBalance, LeaveCommitments, LeaveRequest, LeaveStatus,
};
use accrual_core::overtime::{
    OvertimeBalance, OvertimeRecap, OvertimeRequest, OvertimeStatus, RecapPeriod,
};
use accrual_core::policy::EmployeePolicy;
use accrual_core::store::{AccrualStore, StoreError};
use accrual_shared::types::{
    EmployeeId, Hours, LeaveRequestId, OvertimeRecapId, OvertimeRequestId,
};
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use tracing::{debug, info};

use crate::seed::{EmployeeRecord, SeedError, SeedFile};

/// Everything stored for one employee.
#[derive(Debug, Clone)]
struct EmployeeLedger {
    record: EmployeeRecord,
    overtime_requests: BTreeMap<OvertimeRequestId, OvertimeRequest>,
    overtime_balance: Hours,
    recaps: BTreeMap<RecapPeriod, OvertimeRecap>,
    leave_balances: BTreeMap<i32, LeaveBalance>,
    leave_requests: BTreeMap<LeaveRequestId, LeaveRequest>,
}

impl EmployeeLedger {
    fn new(record: EmployeeRecord) -> Self {
        Self {
            record,
            overtime_requests: BTreeMap::new(),
            overtime_balance: Hours::ZERO,
            recaps: BTreeMap::new(),
            leave_balances: BTreeMap::new(),
            leave_requests: BTreeMap::new(),
        }
    }

    fn claimed_dates(&self, excluding: Option<OvertimeRequestId>) -> BTreeSet<NaiveDate> {
        self.overtime_requests
            .values()
            .filter(|r| r.status.claims_dates() && Some(r.id) != excluding)
            .flat_map(|r| r.entries.iter().map(|e| e.date))
            .collect()
    }

    fn ensure_unclaimed(&self, request: &OvertimeRequest) -> Result<(), StoreError> {
        let claimed = self.claimed_dates(Some(request.id));
        match request.dates().into_iter().find(|d| claimed.contains(d)) {
            Some(date) => Err(StoreError::Conflict(format!(
                "overtime date {date} already claimed"
            ))),
            None => Ok(()),
        }
    }

    fn last_recap_date(&self) -> Option<NaiveDate> {
        self.recaps.keys().next_back().map(|period| period.last_day())
    }

    /// Approved hours dated after the latest recapped day.
    fn unrecapped_hours(&self) -> Hours {
        let after = self.last_recap_date();
        self.overtime_requests
            .values()
            .filter(|r| r.status == OvertimeStatus::Approved)
            .flat_map(|r| r.entries.iter())
            .filter(|e| after.is_none_or(|a| e.date > a))
            .map(|e| e.hours)
            .sum()
    }

    fn leave_balance(&self, year: i32, default_quota: i32) -> LeaveBalance {
        self.leave_balances.get(&year).copied().unwrap_or_else(|| {
            LeaveBalance::new(
                self.record.id,
                year,
                self.record.annual_quota.unwrap_or(default_quota),
            )
        })
    }
}

fn conflict(err: impl std::fmt::Display) -> StoreError {
    StoreError::Conflict(err.to_string())
}

/// Thread-safe in-memory store.
#[derive(Debug)]
pub struct MemoryStore {
    ledgers: DashMap<EmployeeId, EmployeeLedger>,
    overtime_owners: DashMap<OvertimeRequestId, EmployeeId>,
    leave_owners: DashMap<LeaveRequestId, EmployeeId>,
    locks: DashMap<EmployeeId, Arc<Mutex<()>>>,
    default_annual_quota: i32,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(default_annual_quota: i32) -> Self {
        Self {
            ledgers: DashMap::new(),
            overtime_owners: DashMap::new(),
            leave_owners: DashMap::new(),
            locks: DashMap::new(),
            default_annual_quota,
        }
    }

    /// Creates a store holding the employees of a seed file.
    pub fn from_seed(seed: SeedFile, default_annual_quota: i32) -> Result<Self, SeedError> {
        let store = Self::new(default_annual_quota);
        for record in seed.employees {
            let id = record.id;
            if !store.register_employee(record) {
                return Err(SeedError::DuplicateEmployee(id));
            }
        }
        info!(employees = store.ledgers.len(), "Seeded employee directory");
        Ok(store)
    }

    /// Adds an employee. Returns false if the id is already registered.
    pub fn register_employee(&self, record: EmployeeRecord) -> bool {
        match self.ledgers.entry(record.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                debug!(employee_id = %record.id, name = %record.name, "Employee registered");
                slot.insert(EmployeeLedger::new(record));
                true
            }
        }
    }

    /// Directory record of an employee.
    pub fn employee(&self, employee_id: EmployeeId) -> Result<EmployeeRecord, StoreError> {
        self.read(employee_id, |ledger| Ok(ledger.record.clone()))
    }

    fn read<T>(
        &self,
        employee_id: EmployeeId,
        f: impl FnOnce(&EmployeeLedger) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let ledger = self
            .ledgers
            .get(&employee_id)
            .ok_or(StoreError::EmployeeNotFound(employee_id))?;
        f(&ledger)
    }

    fn write(
        &self,
        employee_id: EmployeeId,
    ) -> Result<RefMut<'_, EmployeeId, EmployeeLedger>, StoreError> {
        self.ledgers
            .get_mut(&employee_id)
            .ok_or(StoreError::EmployeeNotFound(employee_id))
    }

    fn overtime_owner(&self, id: OvertimeRequestId) -> Result<EmployeeId, StoreError> {
        self.overtime_owners
            .get(&id)
            .map(|owner| *owner)
            .ok_or(StoreError::OvertimeRequestNotFound(id))
    }

    fn leave_owner(&self, id: LeaveRequestId) -> Result<EmployeeId, StoreError> {
        self.leave_owners
            .get(&id)
            .map(|owner| *owner)
            .ok_or(StoreError::LeaveRequestNotFound(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(12)
    }
}

impl AccrualStore for MemoryStore {
    fn with_employee_lock<T, F>(&self, employee_id: EmployeeId, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lock = Arc::clone(
            self.locks
                .entry(employee_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    fn employee_ids(&self) -> Result<Vec<EmployeeId>, StoreError> {
        let mut ids: Vec<EmployeeId> = self.ledgers.iter().map(|e| *e.key()).collect();
        ids.sort();
        Ok(ids)
    }

    fn employee_policy(&self, employee_id: EmployeeId) -> Result<EmployeePolicy, StoreError> {
        self.read(employee_id, |ledger| Ok(ledger.record.policy()))
    }

    fn pending_or_approved_overtime_dates(
        &self,
        employee_id: EmployeeId,
        excluding: Option<OvertimeRequestId>,
    ) -> Result<BTreeSet<NaiveDate>, StoreError> {
        self.read(employee_id, |ledger| Ok(ledger.claimed_dates(excluding)))
    }

    fn last_recap(&self, employee_id: EmployeeId) -> Result<Option<OvertimeRecap>, StoreError> {
        self.read(employee_id, |ledger| {
            Ok(ledger.recaps.values().next_back().cloned())
        })
    }

    fn recap(
        &self,
        employee_id: EmployeeId,
        period: RecapPeriod,
    ) -> Result<Option<OvertimeRecap>, StoreError> {
        self.read(employee_id, |ledger| Ok(ledger.recaps.get(&period).cloned()))
    }

    fn approved_overtime_hours(
        &self,
        employee_id: EmployeeId,
        period: RecapPeriod,
    ) -> Result<Hours, StoreError> {
        self.read(employee_id, |ledger| {
            let after = ledger.last_recap_date();
            Ok(ledger
                .overtime_requests
                .values()
                .filter(|r| r.status == OvertimeStatus::Approved)
                .map(|r| r.hours_through(after, period))
                .sum())
        })
    }

    fn overtime_balance(&self, employee_id: EmployeeId) -> Result<OvertimeBalance, StoreError> {
        self.read(employee_id, |ledger| {
            Ok(OvertimeBalance {
                employee_id,
                current_balance: ledger.overtime_balance,
            })
        })
    }

    fn insert_overtime_request(&self, request: &OvertimeRequest) -> Result<(), StoreError> {
        {
            let mut ledger = self.write(request.employee_id)?;
            if ledger.overtime_requests.contains_key(&request.id) {
                return Err(conflict(format!("overtime request {} exists", request.id)));
            }
            ledger.ensure_unclaimed(request)?;
            ledger
                .overtime_requests
                .insert(request.id, request.clone());
        }
        self.overtime_owners.insert(request.id, request.employee_id);
        Ok(())
    }

    fn overtime_request(&self, id: OvertimeRequestId) -> Result<OvertimeRequest, StoreError> {
        let owner = self.overtime_owner(id)?;
        self.read(owner, |ledger| {
            ledger
                .overtime_requests
                .get(&id)
                .cloned()
                .ok_or(StoreError::OvertimeRequestNotFound(id))
        })
    }

    fn update_overtime_request(
        &self,
        expected: OvertimeStatus,
        request: &OvertimeRequest,
    ) -> Result<(), StoreError> {
        let mut ledger = self.write(request.employee_id)?;
        let stored_status = ledger
            .overtime_requests
            .get(&request.id)
            .map(|r| r.status)
            .ok_or(StoreError::OvertimeRequestNotFound(request.id))?;
        if stored_status != expected {
            return Err(conflict(format!(
                "overtime request {} is {stored_status}, expected {expected}",
                request.id
            )));
        }
        if request.status.claims_dates() && !stored_status.claims_dates() {
            ledger.ensure_unclaimed(request)?;
        }
        if request.status == OvertimeStatus::Approved && stored_status != OvertimeStatus::Approved
        {
            ledger.overtime_balance += request.total_hours();
        }
        ledger
            .overtime_requests
            .insert(request.id, request.clone());
        Ok(())
    }

    fn persist_recap(&self, recap: &OvertimeRecap) -> Result<OvertimeRecapId, StoreError> {
        let mut ledger = self.write(recap.employee_id)?;
        if ledger.recaps.contains_key(&recap.period) {
            return Err(conflict(format!(
                "recap for {} already exists",
                recap.period
            )));
        }

        let year = recap.period.year;
        let balance = ledger.leave_balance(year, self.default_annual_quota);
        let balance = if recap.toil_days_created > 0 {
            balance
                .apply(BalanceMutation::EarnToil {
                    days: recap.toil_days_created,
                })
                .map_err(conflict)?
        } else {
            balance
        };

        ledger.recaps.insert(recap.period, recap.clone());
        ledger.overtime_balance = ledger.unrecapped_hours();
        ledger.leave_balances.insert(year, balance);
        Ok(recap.id)
    }

    fn leave_balance(&self, employee_id: EmployeeId, year: i32) -> Result<LeaveBalance, StoreError> {
        self.read(employee_id, |ledger| {
            Ok(ledger.leave_balance(year, self.default_annual_quota))
        })
    }

    fn leave_commitments(
        &self,
        employee_id: EmployeeId,
        year: i32,
        excluding: Option<LeaveRequestId>,
    ) -> Result<LeaveCommitments, StoreError> {
        self.read(employee_id, |ledger| {
            let mut held = LeaveCommitments::default();
            ledger
                .leave_requests
                .values()
                .filter(|r| r.year() == year && Some(r.id) != excluding)
                .for_each(|r| held.record(r));
            Ok(held)
        })
    }

    fn persist_leave_balance_mutation(
        &self,
        employee_id: EmployeeId,
        year: i32,
        mutation: BalanceMutation,
    ) -> Result<LeaveBalance, StoreError> {
        let mut ledger = self.write(employee_id)?;
        let next = ledger
            .leave_balance(year, self.default_annual_quota)
            .apply(mutation)
            .map_err(conflict)?;
        ledger.leave_balances.insert(year, next);
        Ok(next)
    }

    fn insert_leave_request(&self, request: &LeaveRequest) -> Result<(), StoreError> {
        {
            let mut ledger = self.write(request.employee_id)?;
            if ledger.leave_requests.contains_key(&request.id) {
                return Err(conflict(format!("leave request {} exists", request.id)));
            }
            ledger.leave_requests.insert(request.id, request.clone());
        }
        self.leave_owners.insert(request.id, request.employee_id);
        Ok(())
    }

    fn leave_request(&self, id: LeaveRequestId) -> Result<LeaveRequest, StoreError> {
        let owner = self.leave_owner(id)?;
        self.read(owner, |ledger| {
            ledger
                .leave_requests
                .get(&id)
                .cloned()
                .ok_or(StoreError::LeaveRequestNotFound(id))
        })
    }

    fn commit_leave_transition(
        &self,
        expected: LeaveStatus,
        request: &LeaveRequest,
        mutation: Option<BalanceMutation>,
    ) -> Result<LeaveBalance, StoreError> {
        let mut ledger = self.write(request.employee_id)?;
        let stored_status = ledger
            .leave_requests
            .get(&request.id)
            .map(|r| r.status)
            .ok_or(StoreError::LeaveRequestNotFound(request.id))?;
        if stored_status != expected {
            return Err(conflict(format!(
                "leave request {} is {stored_status}, expected {expected}",
                request.id
            )));
        }

        let year = request.year();
        let balance = ledger.leave_balance(year, self.default_annual_quota);
        let balance = match mutation {
            Some(mutation) => balance.apply(mutation).map_err(conflict)?,
            None => balance,
        };

        ledger.leave_requests.insert(request.id, request.clone());
        if mutation.is_some() {
            ledger.leave_balances.insert(year, balance);
        }
        Ok(balance)
    }
}
