pub(super) const ROOT_LONG_ABOUT: &str = "\
Build and compare size manifests of directory trees

Filelist records every file below a directory together with its size in a JSON
manifest. Two manifests taken at different times or on different machines can
then be compared to find the files that exist on only one side, without copying
or hashing any file contents. The differing files can be collected into a zip
archive later by a self-contained script that filelist generates.

CORE CONCEPTS:

  Manifests:
    A JSON document mapping each file's path, relative to the scanned directory
    and always separated by '/', to its size in bytes. The scanned directory,
    file count and total size are stored alongside for reference. Bare
    path-to-size mappings written by older versions load as well.

  Comparison:
    Paths are matched by name only. Each path is either only in A, only in B,
    or in both. A file in both with a different size stays 'in both'; its two
    sizes are reported separately.

  Archive scripts:
    A standalone Python 3 program with the differing paths embedded in it.
    Copy it to either machine, run it from the scanned directory, and it zips
    whichever of those paths exist there.

TYPICAL WORKFLOW:

  1. Scan the source before a migration:
     $ filelist scan /srv/data -o before.json

  2. Scan the destination afterwards:
     $ filelist scan /mnt/new/data -o after.json

  3. Compare:
     $ filelist compare before.json after.json --list

  4. Collect the missing files on the source machine:
     $ cd /srv/data && python3 /path/to/zip_different_files.py

GLOBAL OPTIONS:

  -C <DIRECTORY>
    Change to directory before operating (like git -C or make -C). Relative
    manifest, script and report paths are resolved from there.

EXIT STATUS:

  0    success; for 'compare', no path exists on only one side
  1    'compare' found paths that exist on only one side
  255  any error

For detailed help on any command, use:
  filelist <command> --help
";

pub(super) const SCAN_LONG_ABOUT: &str = "\
Scan a directory tree and save its manifest

Recursively lists every regular file below PATH and writes a manifest mapping
each file's relative path to its size in bytes.

WHAT IS RECORDED:

  - Regular files, keyed by their path relative to PATH with '/' separators
  - Symlinks to regular files, with the size of the file they point to
  - Directories are descended into but not recorded themselves
  - Symlinks to directories are not followed, so link cycles are harmless

UNREADABLE ENTRIES:

  Files or subdirectories that cannot be read (permission denied, deleted
  while scanning, names that are not valid UTF-8) are skipped with a warning.
  The scan still succeeds and the manifest covers everything else. Only a
  missing, unreadable or non-directory PATH is an error.

OUTPUT FILE:

  Without --output the manifest is written to the current directory as
  filelist_<digest>_<timestamp>.json, where <digest> identifies the scanned
  directory. An existing file with the same name is replaced.

EXAMPLES:

  # Scan the current directory
  $ filelist scan

  # Scan a directory into a chosen file
  $ filelist scan /srv/data -o before.json
";

pub(super) const COMPARE_LONG_ABOUT: &str = "\
Compare two manifests and generate an archive script for the differences

Loads manifests A and B, prints how many files (and bytes) are in both, only in
A and only in B, and writes an archive script containing every path that exists
on only one side: first those only in A, then those only in B, each sorted.

SIZE DIFFERENCES:

  Paths are matched by name only. A path in both manifests whose size differs
  is still counted as 'in both'; the summary reports how many such files there
  are, and --list shows each with its two sizes.

ARCHIVE SCRIPT:

  Written to zip_different_files.py unless --script or --no-script is given.
  It needs only Python 3. Running it from a directory tree adds each listed
  path that exists there to diff_files.zip (or the archive named by its first
  argument), skips the rest, and reports how many files it compressed.

LIST FORMAT (--list):

  A  <path>                    only in A
  B  <path>                    only in B
  ~  <path> (<size> -> <size>) in both, size differs

EXAMPLES:

  # Compare and write zip_different_files.py
  $ filelist compare before.json after.json

  # Show differing paths, keep a JSON report, skip the script
  $ filelist compare before.json after.json --list --report diff.json --no-script
";
