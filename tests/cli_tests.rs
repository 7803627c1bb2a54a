//! Command-line tests for the tagmatch binary.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TAGS_FASTA: &str = ">alpha\nACGTACGT\n>beta\nAACCGGTT\n>gamma\nAAACCCGGG\n>delta\nTTTTTTTTT\n>bad\nACGNNCGT\n";

const READS_FASTQ: &str = "@r1\nAAACCGGG\n+\nIIIIIIII\n@r2\nagccggtt\n+\nIIIIIIII\n@r3\nGAGAGAGA\n+\nIIIIIIII\n@r4\nTGTTTTTTT\n+\nIIIIIIIII\n";

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn tagmatch() -> Command {
    Command::cargo_bin("tagmatch").unwrap()
}

#[test]
fn test_index_then_classify() {
    let temp = TempDir::new().unwrap();
    let tags = write_file(temp.path(), "tags.fa", TAGS_FASTA);
    let reads = write_file(temp.path(), "reads.fq", READS_FASTQ);
    let index = temp.path().join("tags.idx");

    tagmatch()
        .args(["index", "-k", "4", "-o"])
        .arg(&index)
        .arg(&tags)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 indexed"));
    assert!(index.exists());

    tagmatch()
        .args(["classify", "--format", "tsv", "--index"])
        .arg(&index)
        .arg(&reads)
        .assert()
        .success()
        .stdout(predicate::str::contains("r1\t2\tgamma\t4"))
        .stdout(predicate::str::contains("r2\t1\tbeta\t3"))
        .stdout(predicate::str::contains("r3\t-\t-\t0"))
        .stdout(predicate::str::contains("r4\t3\tdelta\t4"));
}

#[test]
fn test_classify_from_reference_json() {
    let temp = TempDir::new().unwrap();
    let tags = write_file(temp.path(), "tags.fa", TAGS_FASTA);
    let reads = write_file(temp.path(), "reads.fq", READS_FASTQ);

    let output = tagmatch()
        .args(["classify", "-k", "4", "--identity", "--format", "json", "--reference"])
        .arg(&tags)
        .arg(&reads)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["reads"], 4);
    assert_eq!(json["summary"]["matched"], 3);
    assert_eq!(json["reads"][0]["match"]["tag"], "AAACCCGGG");
    assert_eq!(json["reads"][0]["identity"]["edit_distance"], 1);
    assert!(json["reads"][2]["match"].is_null());
}

#[test]
fn test_classify_min_votes() {
    let temp = TempDir::new().unwrap();
    let tags = write_file(temp.path(), "tags.fa", TAGS_FASTA);
    let reads = write_file(temp.path(), "reads.fq", READS_FASTQ);

    tagmatch()
        .args(["classify", "-k", "4", "--min-votes", "4", "--reference"])
        .arg(&tags)
        .arg(&reads)
        .assert()
        .success()
        .stdout(predicate::str::contains("r2\tno match"))
        .stdout(predicate::str::contains("Matched 2 of 4 reads"));
}

#[test]
fn test_classify_reports_rejected_reads() {
    let temp = TempDir::new().unwrap();
    let tags = write_file(temp.path(), "tags.fa", TAGS_FASTA);
    let reads = write_file(
        temp.path(),
        "reads.fq",
        "@ok\nAAACCCGGG\n+\nIIIIIIIII\n@bad\nAAACNCGGG\n+\nIIIIIIIII\n",
    );

    tagmatch()
        .args(["classify", "-k", "4", "--format", "tsv", "--reference"])
        .arg(&tags)
        .arg(&reads)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok\t2\tgamma\t6\t6\tExact"))
        .stdout(predicate::str::contains("bad\t-\t-\t0\t-\trejected"));

    tagmatch()
        .args(["classify", "-k", "4", "--reference"])
        .arg(&tags)
        .arg(&reads)
        .assert()
        .success()
        .stdout(predicate::str::contains("bad\trejected (Invalid symbol 'N' at position 4)"))
        .stdout(predicate::str::contains(
            "Matched 1 of 2 reads (50.0%), 0 unmatched, 1 rejected",
        ));
}

#[test]
fn test_classify_requires_index_or_reference() {
    let temp = TempDir::new().unwrap();
    let reads = write_file(temp.path(), "reads.fq", READS_FASTQ);

    tagmatch().arg("classify").arg(&reads).assert().failure();
}

#[test]
fn test_index_rejects_invalid_word_length() {
    let temp = TempDir::new().unwrap();
    let tags = write_file(temp.path(), "tags.fa", TAGS_FASTA);

    tagmatch()
        .args(["index", "-k", "40", "-o"])
        .arg(temp.path().join("tags.idx"))
        .arg(&tags)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid word length 40"));
}

#[test]
fn test_align_flanked_sequence() {
    tagmatch()
        .args([
            "align",
            "--format",
            "tsv",
            "CGGGTGTGACAGTCGTGCAGTCGACCGTTGGG",
            "XXXXCGGGTGTGACAGTCGTGCAGTCGACCGTTGGGXXXX",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("64\t0\t4\t32\t36"));
}

#[test]
fn test_align_text_rendering() {
    tagmatch()
        .args(["align", "ACGTACGT", "acgtTcgt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACGTACGT\n|||| |||\nACGTTCGT\nScore: 12"))
        .stdout(predicate::str::contains("Edit distance: 1"));
}

#[test]
fn test_align_large_match_reward() {
    tagmatch()
        .args(["align", "--format", "tsv", "--match-reward", "2147483647", "ACGT", "ACGT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8589934588\t0\t0\t4\t4"));
}

#[test]
fn test_align_rejects_invalid_symbol() {
    tagmatch()
        .args(["align", "ACGT", "AC-T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid symbol '-' at position 2"));
}

#[test]
fn test_align_rejects_invalid_scheme() {
    tagmatch()
        .args(["align", "--match-reward", "0", "ACGT", "ACGT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scoring scheme"));
}
