pub mod appointment;
pub mod booking;

pub use appointment::AppointmentService;
pub use booking::AppointmentBookingService;
