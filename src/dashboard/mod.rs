//! Dashboard
//!
//! Everything between the sensor API and the rendered page.
//!
//! ## Data Flow
//!
//! 1. [`Dashboard::refresh`] fetches devices and readings
//! 2. Each result lands in a [`CacheSlot`]; failures keep the last good value
//! 3. [`DashboardSnapshot::page`] selects a device and builds its [`PageView`]
//! 4. [`render_page`] turns the view into HTML with embedded chart options

pub mod cache;
pub mod charts;
pub mod render;
pub mod service;
pub mod view;

pub use cache::{CacheSlot, Resolved};
pub use charts::{aqi_gauge, dust_gauge, line_chart, melt, Element, ElementPoint};
pub use render::{format_value, render_page, RenderOptions, PAGE_TITLE};
pub use service::{Dashboard, DashboardSnapshot, RefreshReport};
pub use view::{Banner, BannerLevel, DeviceView, PageView};
