//! Onboarding tutorial content for lexidec CLI

/// Get the interactive onboarding tutorial content
pub fn get_onboarding_content() -> &'static str {
    r#"WELCOME TO LEXIDEC

Lexidec turns decimal numbers into strings whose plain byte order is
their numeric order.

STEP 1: ENCODE A NUMBER
-----------------------
Pass values as arguments or pipe them in, one per line.

  lexidec encode 123
  => +cE1.23

  lexidec encode 5 0.5 -1
  => +aE5
  => +ZE5
  => !ZE9

STEP 2: SORT WITHOUT PARSING
----------------------------
Encoded numbers sort numerically under any plain string sort.

  printf '3\n-7\n0.2\n100\n' | lexidec encode | sort
  => !ZE3
  => +ZE2
  => +aE3
  => +cE1

Decoded back, that is -7, 0.2, 3, 100.

STEP 3: DECODE
--------------
Decoding restores the exact decimal spelling.

  lexidec decode '+cE1.23'
  => 123

STEP 4: NEGATIVE NUMBERS
------------------------
Negative digits are stored as ten's complements, so larger magnitudes
produce smaller strings and sort first.

  lexidec encode -123
  => !XE8.77

STEP 5: REWRITE A PATTERN
-------------------------
Patterns over plain decimals become patterns over encodings. The zero
alternative is added whenever the pattern could match a zero spelling.

  lexidec normalize '\d\d'
  => \+bE\d(\.\d)?|\+AE0

STEP 6: CHECK A PATTERN
-----------------------
check validates, rewrites, and reports whether the rewrite is exact.

  lexidec check '1\d*'
  => \+[a-z]E1(\.\d*[1-9])?
  => lossy

NEXT STEPS
----------
  lexidec docs                 List all documentation categories
  lexidec doc encoding         The wire format in detail
  lexidec doc ordering         Why byte order equals numeric order
  lexidec doc patterns         The accepted pattern dialect
"#
}
