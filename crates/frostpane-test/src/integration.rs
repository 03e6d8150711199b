//! End-to-end scenario tests
//!
//! Every externally testable property of the system, driven through the
//! full runtime: scripted detections in, transitions and published signals
//! out.
