// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tolerance based comparisons for the floating point control values. All the
//! checks performed by the solvers (convexity, integrality, the deviation
//! bound) go through these rather than through exact comparison so that an
//! accumulation of rounding noise cannot flip a verdict.

/// The tolerance used whenever the caller does not specify one.
pub const DEFAULT_EPS: f64 = 1e-6;

/// True iff `a` and `b` are equal up to `eps`.
#[inline]
pub fn eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// True iff `a` is lower than or equal to `b` up to `eps`.
#[inline]
pub fn le(a: f64, b: f64, eps: f64) -> bool {
    a <= b + eps
}

/// True iff `a` is zero up to `eps`.
#[inline]
pub fn zero(a: f64, eps: f64) -> bool {
    a.abs() <= eps
}

/// True iff `a` is strictly negative, beyond `eps`.
#[inline]
pub fn neg(a: f64, eps: f64) -> bool {
    a < -eps
}

/// True iff `a` is an integer up to `eps`.
#[inline]
pub fn integral(a: f64, eps: f64) -> bool {
    eq(a, a.round(), eps)
}

/// Rounds a value known to be integral up to `eps` to the nearest integer.
#[inline]
pub fn round(a: f64, eps: f64) -> f64 {
    debug_assert!(integral(a, eps));
    a.round()
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
