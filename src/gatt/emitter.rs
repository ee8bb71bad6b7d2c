//! Input report emission.
//!
//! Reports are packed and handed to the transport only while the input
//! report characteristic is notifying; otherwise they are dropped on the
//! floor with no backlog.

use super::path::ObjectPath;
use super::tree::GattApplication;
use crate::config::AXIS_COUNT;
use crate::hid::JoystickReport;

/// Receiver of property-change notifications on a characteristic's value.
///
/// Implemented by the transport. Called from the sampling context, so
/// implementations must not block.
pub trait ReportSink {
    fn value_changed(&self, path: &ObjectPath, value: &[u8]);
}

impl<T: ReportSink + ?Sized> ReportSink for &T {
    fn value_changed(&self, path: &ObjectPath, value: &[u8]) {
        (**self).value_changed(path, value)
    }
}

impl GattApplication {
    /// Emit `report` if a central is subscribed.
    ///
    /// Returns `true` when a notification was raised.
    pub fn send_report<S: ReportSink + ?Sized>(&self, report: &JoystickReport, sink: &S) -> bool {
        let id = self.input_report();
        if !self.is_notifying(id) {
            return false;
        }
        let bytes = report.to_bytes();
        sink.value_changed(self.path(id.into()), &bytes);
        true
    }

    /// Clamp `axes` to the 16-bit axis domain and emit.
    pub fn send_axes<S: ReportSink + ?Sized>(
        &self,
        axes: [i32; AXIS_COUNT],
        button: bool,
        sink: &S,
    ) -> bool {
        self.send_report(&JoystickReport::from_wide(axes, button), sink)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;
    use crate::config::APPLICATION_PATH;
    use crate::gatt::properties::Interface;
    use crate::gatt::tree::NodeId;

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<std::vec::Vec<(std::string::String, std::vec::Vec<u8>)>>,
    }

    impl ReportSink for RecordingSink {
        fn value_changed(&self, path: &ObjectPath, value: &[u8]) {
            self.sent
                .borrow_mut()
                .push((path.as_str().into(), value.to_vec()));
        }
    }

    fn subscribed_app() -> GattApplication {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00])
            .unwrap();
        app
    }

    #[test]
    fn nothing_sent_while_unsubscribed() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let sink = RecordingSink::default();
        assert!(!app.send_axes([1, 2, 3, 4, 5], true, &sink));
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn scenario_report_is_emitted() {
        let app = subscribed_app();
        let sink = RecordingSink::default();
        assert!(app.send_axes([100, -200, 300, -400, 500], true, &sink));

        let sent = sink.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "/glove/hid/service0/char5");
        assert_eq!(
            sent[0].1,
            [0x01, 0x01, 0x64, 0x00, 0x38, 0xFF, 0x2C, 0x01, 0x70, 0xFE, 0xF4, 0x01]
        );
    }

    #[test]
    fn out_of_range_axes_are_clamped() {
        let app = subscribed_app();
        let sink = RecordingSink::default();
        app.send_axes([40_000, -40_000, 0, 0, 0], false, &sink);

        let sent = sink.sent.borrow();
        assert_eq!(&sent[0].1[..6], &[0x01, 0x00, 0xFF, 0x7F, 0x00, 0x80]);
    }

    #[test]
    fn unsubscribe_stops_emission() {
        let app = subscribed_app();
        let sink = RecordingSink::default();
        assert!(app.send_report(&JoystickReport::neutral(), &sink));
        app.stop_notify(
            NodeId::Characteristic(app.input_report()),
            Interface::GattCharacteristic,
        )
        .unwrap();
        assert!(!app.send_report(&JoystickReport::neutral(), &sink));
        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn sink_by_reference() {
        let app = subscribed_app();
        let sink = RecordingSink::default();
        let by_ref = &sink;
        assert!(app.send_report(&JoystickReport::neutral(), &by_ref));
        assert_eq!(sink.sent.borrow().len(), 1);
    }
}
