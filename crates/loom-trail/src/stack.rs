// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Renders Rust backtraces into the `stack` string of an error.

use std::backtrace::Backtrace;

use rustc_demangle::demangle;

/// One application frame pulled out of a backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StackFrame {
	function: String,
	location: Option<String>,
}

/// Renders the application frames of a backtrace, one `at ...` line each.
///
/// Returns `None` when capture was disabled or no application frame remains.
pub fn render_stack(backtrace: &Backtrace) -> Option<String> {
	let frames = parse_frames(&format!("{backtrace}"));
	let lines: Vec<String> = frames
		.iter()
		.filter(|f| is_in_app_frame(&f.function))
		.map(|f| match &f.location {
			Some(location) => format!("    at {} ({location})", f.function),
			None => format!("    at {}", f.function),
		})
		.collect();

	(!lines.is_empty()).then(|| lines.join("\n"))
}

/// Captures the current stack, ignoring `RUST_BACKTRACE`.
pub fn capture_stack() -> Option<String> {
	render_stack(&Backtrace::force_capture())
}

/// Parses `std` backtrace output:
///
/// ```text
///    0: my_app::handlers::process
///              at ./src/handlers.rs:10:5
/// ```
fn parse_frames(output: &str) -> Vec<StackFrame> {
	let mut frames: Vec<StackFrame> = Vec::new();

	for line in output.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(last) = frames.last_mut() {
				if last.location.is_none() {
					last.location = Some(location.to_string());
				}
			}
			continue;
		}

		if let Some(function) = strip_frame_number(line) {
			frames.push(StackFrame {
				function: format!("{:#}", demangle(function)),
				location: None,
			});
		}
	}

	frames
}

fn strip_frame_number(line: &str) -> Option<&str> {
	let (prefix, rest) = line.split_once(':')?;
	prefix.trim().parse::<u32>().ok()?;
	let function = rest.trim();
	(!function.is_empty()).then_some(function)
}

/// Determine if a frame is from application code vs the runtime.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"backtrace::",
		"rustc_demangle::",
		"loom_trail::",
		"<loom_trail::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
		"__libc_",
		"_start",
	];

	const SYSTEM_CONTAINS: &[&str] = &["::panic::", "::panicking::", "::rt::", "::sys_common::"];

	if SYSTEM_PREFIXES.iter().any(|p| function.starts_with(p)) {
		return false;
	}

	!SYSTEM_CONTAINS.iter().any(|c| function.contains(c))
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: loom_trail::stack::capture_stack
             at ./crates/loom-trail/src/stack.rs:30:5
   2: my_app::checkout::submit
             at ./src/checkout.rs:42:9
   3: my_app::main
   4: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5";

	#[test]
	fn test_parse_frames_attaches_locations() {
		let frames = parse_frames(SAMPLE);

		assert_eq!(frames.len(), 5);
		assert_eq!(frames[2].function, "my_app::checkout::submit");
		assert_eq!(frames[2].location.as_deref(), Some("./src/checkout.rs:42:9"));
		assert_eq!(frames[3].location, None);
	}

	#[test]
	fn test_parse_frames_demangles() {
		let frames = parse_frames("   0: _ZN6my_app4main17h0123456789abcdefE");
		assert_eq!(frames[0].function, "my_app::main");
	}

	#[test]
	fn test_in_app_filter() {
		assert!(!is_in_app_frame("std::panicking::begin_panic"));
		assert!(!is_in_app_frame("core::ops::function::FnOnce::call_once"));
		assert!(!is_in_app_frame("loom_trail::stack::capture_stack"));
		assert!(is_in_app_frame("my_app::checkout::submit"));
	}

	#[test]
	fn test_disabled_backtrace_renders_nothing() {
		assert_eq!(render_stack(&Backtrace::disabled()), None);
	}

	#[test]
	fn test_capture_stack_does_not_panic() {
		// Frame availability depends on debug info.
		let _ = capture_stack();
	}
}
