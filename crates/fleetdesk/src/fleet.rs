//! Fleet store: vehicle records with CRUD, search and summary figures.
//!
//! The in-memory collection mirrors the persisted `vehicles` key. Mutations
//! rewrite the whole collection; searches and counts read memory only.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{NewVehicle, SearchCriteria, Vehicle, VehiclePatch, VehicleStatus};
use crate::storage::{Storage, VEHICLES_KEY};

/// Source of ids for newly added vehicles.
pub type IdClock = fn() -> i64;

/// Current Unix time in milliseconds.
///
/// Two adds within the same millisecond get the same id.
#[must_use]
pub fn timestamp_id() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Summary figures shown alongside the vehicle list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    /// Number of vehicles.
    pub total: usize,
    /// Vehicles with status `available`.
    pub available: usize,
    /// Vehicles with status `rented`.
    pub rented: usize,
    /// Mean daily price, 0 for an empty fleet.
    pub average_price: f64,
}

/// Manages the vehicle collection.
#[derive(Debug)]
pub struct FleetStore {
    storage: Rc<Storage>,
    vehicles: Vec<Vehicle>,
    clock: IdClock,
}

impl FleetStore {
    /// Load the fleet, writing `seed` if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted collection cannot be read or written.
    pub fn open(storage: Rc<Storage>, seed: &[Vehicle]) -> Result<Self> {
        Self::with_clock(storage, seed, timestamp_id)
    }

    /// Like [`FleetStore::open`], with a custom id source.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted collection cannot be read or written.
    pub fn with_clock(storage: Rc<Storage>, seed: &[Vehicle], clock: IdClock) -> Result<Self> {
        let mut store = Self {
            storage,
            vehicles: Vec::new(),
            clock,
        };
        store.reload()?;

        if store.vehicles.is_empty() && !seed.is_empty() {
            info!("Seeding {} default vehicles", seed.len());
            store.vehicles = seed.to_vec();
            store.save()?;
        }

        Ok(store)
    }

    /// Reload from storage and return the whole fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted collection cannot be read.
    pub fn get_all_vehicles(&mut self) -> Result<&[Vehicle]> {
        self.reload()?;
        Ok(&self.vehicles)
    }

    /// The in-memory fleet, without reloading.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Append a vehicle with a fresh id and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be persisted.
    pub fn add_vehicle(&mut self, vehicle: NewVehicle) -> Result<Vehicle> {
        let vehicle = vehicle.into_vehicle((self.clock)());
        self.vehicles.push(vehicle.clone());
        self.save()?;

        info!("Added vehicle {} ({})", vehicle.id, vehicle.plate_number);
        Ok(vehicle)
    }

    /// Merge `patch` into the first vehicle with `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no vehicle has `id`.
    pub fn update_vehicle(&mut self, id: i64, patch: &VehiclePatch) -> Result<Vehicle> {
        let vehicle = self
            .vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .ok_or_else(|| Error::record_not_found(id))?;

        patch.apply(vehicle);
        let updated = vehicle.clone();
        self.save()?;

        info!("Updated vehicle {}", id);
        Ok(updated)
    }

    /// Remove the first vehicle with `id`, persist, and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no vehicle has `id`.
    pub fn delete_vehicle(&mut self, id: i64) -> Result<Vehicle> {
        let index = self
            .vehicles
            .iter()
            .position(|vehicle| vehicle.id == id)
            .ok_or_else(|| Error::record_not_found(id))?;

        let removed = self.vehicles.remove(index);
        self.save()?;

        info!("Deleted vehicle {}", id);
        Ok(removed)
    }

    /// Vehicles in memory that satisfy `criteria`. Does not reload.
    #[must_use]
    pub fn search_vehicles(&self, criteria: &SearchCriteria) -> Vec<Vehicle> {
        let found: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|vehicle| criteria.matches(vehicle))
            .cloned()
            .collect();
        debug!("Search matched {} of {}", found.len(), self.vehicles.len());
        found
    }

    /// Number of vehicles with status `available`.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.count_with(VehicleStatus::Available)
    }

    /// Number of vehicles with status `rented`.
    #[must_use]
    pub fn rented_count(&self) -> usize {
        self.count_with(VehicleStatus::Rented)
    }

    /// Mean price over the in-memory fleet, exactly 0 when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_price(&self) -> f64 {
        if self.vehicles.is_empty() {
            return 0.0;
        }
        let total: f64 = self.vehicles.iter().map(|vehicle| vehicle.price).sum();
        total / self.vehicles.len() as f64
    }

    /// All summary figures at once.
    #[must_use]
    pub fn stats(&self) -> FleetStats {
        FleetStats {
            total: self.vehicles.len(),
            available: self.available_count(),
            rented: self.rented_count(),
            average_price: self.average_price(),
        }
    }

    fn count_with(&self, status: VehicleStatus) -> usize {
        self.vehicles
            .iter()
            .filter(|vehicle| vehicle.status == status)
            .count()
    }

    fn reload(&mut self) -> Result<()> {
        if let Some(vehicles) = self.storage.load_json::<Vec<Vehicle>>(VEHICLES_KEY)? {
            self.vehicles = vehicles;
        }
        debug!("Loaded {} vehicles", self.vehicles.len());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.storage.save_json(VEHICLES_KEY, &self.vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_vehicles;

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn create_test_store() -> (Rc<Storage>, FleetStore) {
        let storage = Rc::new(Storage::open_in_memory().expect("failed to create test storage"));
        let store =
            FleetStore::with_clock(Rc::clone(&storage), &default_vehicles(), fixed_clock).unwrap();
        (storage, store)
    }

    fn empty_store() -> FleetStore {
        let storage = Rc::new(Storage::open_in_memory().unwrap());
        FleetStore::with_clock(storage, &[], fixed_clock).unwrap()
    }

    fn new_vehicle(plate: &str, brand: &str, price: f64) -> NewVehicle {
        NewVehicle {
            id: None,
            plate_number: plate.to_string(),
            brand: brand.to_string(),
            price,
            status: VehicleStatus::Available,
        }
    }

    #[test]
    fn test_open_seeds_defaults() {
        let (storage, store) = create_test_store();

        assert_eq!(store.vehicles(), default_vehicles().as_slice());
        let persisted: Vec<Vehicle> = storage.load_json(VEHICLES_KEY).unwrap().unwrap();
        assert_eq!(persisted.len(), 4);
    }

    #[test]
    fn test_open_keeps_persisted_fleet() {
        let storage = Rc::new(Storage::open_in_memory().unwrap());
        let stored = vec![Vehicle::new(
            9,
            "苏E·9L3P6",
            "现代",
            310.0,
            VehicleStatus::Unavailable,
        )];
        storage.save_json(VEHICLES_KEY, &stored).unwrap();

        let store = FleetStore::open(storage, &default_vehicles()).unwrap();
        assert_eq!(store.vehicles(), stored.as_slice());
    }

    #[test]
    fn test_open_without_seed_stays_empty() {
        let store = empty_store();
        assert!(store.vehicles().is_empty());
    }

    #[test]
    fn test_default_seed_figures() {
        let (_storage, store) = create_test_store();

        assert_eq!(store.available_count(), 2);
        assert_eq!(store.rented_count(), 2);
        assert!((store.average_price() - 335.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_then_get_all() {
        let (_storage, mut store) = create_test_store();

        let added = store.add_vehicle(new_vehicle("沪B·7K8V2", "本田", 420.0)).unwrap();
        assert_eq!(added.id, fixed_clock());

        let all = store.get_all_vehicles().unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.contains(&added));
        assert_eq!(all[4].plate_number, "沪B·7K8V2");
        assert_eq!(all[4].brand, "本田");
        assert!((all[4].price - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_with_explicit_id() {
        let (_storage, mut store) = create_test_store();
        let mut vehicle = new_vehicle("X", "Y", 1.0);
        vehicle.id = Some(15);

        assert_eq!(store.add_vehicle(vehicle).unwrap().id, 15);
    }

    #[test]
    fn test_add_uses_timestamp_by_default() {
        let storage = Rc::new(Storage::open_in_memory().unwrap());
        let mut store = FleetStore::open(storage, &[]).unwrap();
        let before = timestamp_id();

        let added = store.add_vehicle(new_vehicle("X", "Y", 1.0)).unwrap();
        assert!(added.id >= before);
    }

    #[test]
    fn test_update_status_only() {
        let (storage, mut store) = create_test_store();

        let updated = store
            .update_vehicle(1, &VehiclePatch::status(VehicleStatus::Rented))
            .unwrap();
        assert_eq!(
            updated,
            Vehicle::new(1, "京A12345", "丰田", 300.0, VehicleStatus::Rented)
        );

        let persisted: Vec<Vehicle> = storage.load_json(VEHICLES_KEY).unwrap().unwrap();
        assert_eq!(persisted[0].status, VehicleStatus::Rented);
    }

    #[test]
    fn test_update_missing_leaves_fleet_unchanged() {
        let (storage, mut store) = create_test_store();
        let before = storage.get_item(VEHICLES_KEY).unwrap();

        let err = store
            .update_vehicle(404, &VehiclePatch::status(VehicleStatus::Rented))
            .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { id: 404 }));
        assert_eq!(store.vehicles(), default_vehicles().as_slice());
        assert_eq!(storage.get_item(VEHICLES_KEY).unwrap(), before);
    }

    #[test]
    fn test_delete_then_delete_again() {
        let (_storage, mut store) = create_test_store();

        let removed = store.delete_vehicle(3).unwrap();
        assert_eq!(removed.plate_number, "京C11111");
        assert_eq!(store.get_all_vehicles().unwrap().len(), 3);

        let err = store.delete_vehicle(3).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { id: 3 }));
    }

    #[test]
    fn test_delete_removes_first_match_only() {
        let (_storage, mut store) = create_test_store();
        let mut duplicate = new_vehicle("dup", "dup", 1.0);
        duplicate.id = Some(2);
        store.add_vehicle(duplicate).unwrap();

        let removed = store.delete_vehicle(2).unwrap();
        assert_eq!(removed.plate_number, "京B67890");
        assert_eq!(store.vehicles().iter().filter(|v| v.id == 2).count(), 1);
    }

    #[test]
    fn test_search_by_brand() {
        let (_storage, mut store) = create_test_store();
        store.add_vehicle(new_vehicle("粤A·3D9XW", "一汽丰田", 280.0)).unwrap();

        let criteria = SearchCriteria {
            brand: Some("丰田".to_string()),
            ..SearchCriteria::default()
        };
        let found = store.search_vehicles(&criteria);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|v| v.brand.contains("丰田")));
    }

    #[test]
    fn test_search_empty_criteria_returns_all() {
        let (_storage, store) = create_test_store();
        assert_eq!(
            store.search_vehicles(&SearchCriteria::default()),
            default_vehicles()
        );
    }

    #[test]
    fn test_search_combines_filters() {
        let (_storage, store) = create_test_store();

        let criteria = SearchCriteria {
            plate_number: Some("京".to_string()),
            brand: None,
            status: Some(VehicleStatus::Rented),
        };
        let ids: Vec<i64> = store.search_vehicles(&criteria).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_search_does_not_reload() {
        let (storage, store) = create_test_store();
        storage.save_json(VEHICLES_KEY, &Vec::<Vehicle>::new()).unwrap();

        assert_eq!(store.search_vehicles(&SearchCriteria::default()).len(), 4);
    }

    #[test]
    fn test_get_all_overwrites_memory() {
        let (storage, mut store) = create_test_store();
        let replacement = vec![Vehicle::new(1, "A", "B", 10.0, VehicleStatus::Available)];
        storage.save_json(VEHICLES_KEY, &replacement).unwrap();

        assert_eq!(store.get_all_vehicles().unwrap(), replacement.as_slice());
    }

    #[test]
    fn test_average_price_empty_is_zero() {
        let store = empty_store();
        assert!(store.average_price().abs() < f64::EPSILON);
        assert_eq!(store.available_count(), 0);
        assert_eq!(store.rented_count(), 0);
    }

    #[test]
    fn test_average_price_known_set() {
        let mut store = empty_store();
        for (id, price) in [1, 2, 3].into_iter().zip([100.0, 250.0, 400.0]) {
            let mut vehicle = new_vehicle("p", "b", price);
            vehicle.id = Some(id);
            store.add_vehicle(vehicle).unwrap();
        }
        assert!((store.average_price() - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats() {
        let (_storage, store) = create_test_store();
        let stats = store.stats();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.rented, 2);
        assert!((stats.average_price - 335.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corrupted_fleet_is_an_error() {
        let storage = Rc::new(Storage::open_in_memory().unwrap());
        storage.set_item(VEHICLES_KEY, "{oops").unwrap();

        let err = FleetStore::open(storage, &default_vehicles()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
