//! Beacon Core Library
//!
//! Core engine for Beacon - a personal-safety companion. This crate
//! implements the device-side sync engine: journey lifecycle and
//! tracking, geofence transition detection with hysteresis, an
//! append-only event journal, a bounded offline delivery queue, and
//! share-code encrypted location publishing.
//!
//! The engine is platform-agnostic. The host app wires the OS seams
//! ([`storage::KvStore`], [`remote::RemoteStore`],
//! [`location::LocationProvider`], [`tasks::RegionMonitor`],
//! [`notify::NotificationSink`]) and drives the
//! [`journey::JourneyManager`] from its UI and OS callbacks.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod cipher;
pub mod geofence;
pub mod journal;
pub mod journey;
pub mod location;
pub mod notify;
pub mod queue;
pub mod remote;
pub mod storage;
pub mod tasks;

mod ids;
