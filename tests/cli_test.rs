use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use assert_cmd::Command; // Run programs
use std::path::Path;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn mkdsk(path: &Path,kind: &str) -> TestResult {
    Command::cargo_bin("d64kit")?
        .arg("mkdsk")
        .arg("-k").arg(kind)
        .arg("-i").arg("01")
        .arg("-d").arg(path)
        .assert()
        .success();
    Ok(())
}

fn put(path: &Path,name: &str,typ: &str,dat: &[u8]) -> TestResult {
    Command::cargo_bin("d64kit")?
        .arg("put")
        .arg("-f").arg(name)
        .arg("-t").arg(typ)
        .arg("-d").arg(path)
        .write_stdin(dat)
        .assert()
        .success();
    Ok(())
}

#[test]
fn catalog_blank() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("blank.d64");
    mkdsk(&path,"35")?;
    assert_eq!(std::fs::metadata(&path)?.len(),174848);
    Command::cargo_bin("d64kit")?
        .arg("catalog")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 \"NEW DISK        \" 01 2A"))
        .stdout(predicate::str::contains("664 BLOCKS FREE."));

    let path40 = dir.path().join("blank40.d64");
    mkdsk(&path40,"40")?;
    assert_eq!(std::fs::metadata(&path40)?.len(),196608);
    Command::cargo_bin("d64kit")?
        .arg("catalog")
        .arg("-d").arg(&path40)
        .assert()
        .success()
        .stdout(predicate::str::contains("749 BLOCKS FREE."));
    Ok(())
}

#[test]
fn refuse_overwrite() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("blank.d64");
    mkdsk(&path,"35")?;
    Command::cargo_bin("d64kit")?
        .arg("mkdsk")
        .arg("-d").arg(&path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn put_and_get() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("files.d64");
    mkdsk(&path,"35")?;
    put(&path,"HELLO","prg",&[0xa9,0x00,0x60])?;
    put(&path,"NOTES","seq","HELLO WORLD".as_bytes())?;
    Command::cargo_bin("d64kit")?
        .arg("catalog")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1    \"HELLO\"            PRG"))
        .stdout(predicate::str::contains("1    \"NOTES\"            SEQ"))
        .stdout(predicate::str::contains("664 BLOCKS FREE."));
    Command::cargo_bin("d64kit")?
        .arg("get")
        .arg("-f").arg("HELLO")
        .arg("-t").arg("prg")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(&[0xa9u8,0x00,0x60] as &[u8]));
    Command::cargo_bin("d64kit")?
        .arg("get")
        .arg("-f").arg("HELLO")
        .arg("-t").arg("raw")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(&[0x01u8,0x08,0xa9,0x00,0x60] as &[u8]));
    Command::cargo_bin("d64kit")?
        .arg("get")
        .arg("-f").arg("NOTES")
        .arg("-t").arg("seq")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("HELLO WORLD"));
    Ok(())
}

#[test]
fn relative_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("rel.d64");
    mkdsk(&path,"35")?;
    Command::cargo_bin("d64kit")?
        .arg("put")
        .arg("-f").arg("RECS")
        .arg("-t").arg("rel")
        .arg("-l").arg("10")
        .arg("-d").arg(&path)
        .write_stdin("0123456789ABCDEFGHIJxyz")
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("get")
        .arg("-f").arg("RECS")
        .arg("-t").arg("rel")
        .arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq("0123456789ABCDEFGHIJxyz".as_bytes()));
    // record length is required
    Command::cargo_bin("d64kit")?
        .arg("put")
        .arg("-f").arg("MORE")
        .arg("-t").arg("rel")
        .arg("-d").arg(&path)
        .write_stdin("abc")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn lock_and_delete() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lock.d64");
    mkdsk(&path,"35")?;
    put(&path,"KEEP","usr",&[1,2,3])?;
    Command::cargo_bin("d64kit")?
        .arg("lock").arg("-f").arg("KEEP").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("delete").arg("-f").arg("KEEP").arg("-d").arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WriteProtect"));
    Command::cargo_bin("d64kit")?
        .arg("catalog").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("USR<"));
    Command::cargo_bin("d64kit")?
        .arg("unlock").arg("-f").arg("KEEP").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("delete").arg("-f").arg("KEEP").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("catalog").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("KEEP").not())
        .stdout(predicate::str::contains("664 BLOCKS FREE."));
    Ok(())
}

#[test]
fn rename_and_retype() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("names.d64");
    mkdsk(&path,"35")?;
    put(&path,"OLD","seq",&[1,2,3])?;
    Command::cargo_bin("d64kit")?
        .arg("rename").arg("-f").arg("OLD").arg("-n").arg("NEW").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("retype").arg("-f").arg("NEW").arg("-t").arg("prg").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("rendsk").arg("-n").arg("STUFF").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("catalog").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 \"STUFF           \" 01 2A"))
        .stdout(predicate::str::contains("\"NEW\"              PRG"));
    Ok(())
}

#[test]
fn verify_and_log() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("check.d64");
    let log_path = dir.path().join("check.log");
    mkdsk(&path,"35")?;
    put(&path,"DATA","seq",&[0x55;600])?;
    Command::cargo_bin("d64kit")?
        .arg("verify").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no discrepancies"));

    // zap the free count of track 1
    let mut img = std::fs::read(&path)?;
    img[0x16500 + 4] = 3;
    std::fs::write(&path,&img)?;
    Command::cargo_bin("d64kit")?
        .arg("verify").arg("--repair").arg("--log").arg(&log_path).arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 discrepancies"));
    assert_eq!(std::fs::read_to_string(&log_path)?,"track 1 free count is 3, should be 21\n");
    Command::cargo_bin("d64kit")?
        .arg("verify").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no discrepancies"));
    Ok(())
}

#[test]
fn sort_and_extract() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sort.d64");
    mkdsk(&path,"35")?;
    for name in ["ZED","ALPHA","MID"] {
        put(&path,name,"seq",name.as_bytes())?;
    }
    Command::cargo_bin("d64kit")?
        .arg("sort").arg("--alpha").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("catalog").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_match("ALPHA(.|\n)*MID(.|\n)*ZED")?);
    Command::cargo_bin("d64kit")?
        .arg("mvfirst").arg("-f").arg("ZED").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("catalog").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_match("ZED(.|\n)*ALPHA(.|\n)*MID")?);
    Command::cargo_bin("d64kit")?
        .arg("compact").arg("-d").arg(&path)
        .assert()
        .success();
    Command::cargo_bin("d64kit")?
        .arg("extract").arg("-f").arg("MID").arg("-o").arg(dir.path()).arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("MID.seq"));
    assert_eq!(std::fs::read(dir.path().join("MID.seq"))?,"MID".as_bytes());
    Ok(())
}

#[test]
fn sector_access() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sec.d64");
    mkdsk(&path,"35")?;
    Command::cargo_bin("d64kit")?
        .arg("put").arg("-f").arg("1,1").arg("-t").arg("sec").arg("-d").arg(&path)
        .write_stdin("SECTOR")
        .assert()
        .success();
    let img = std::fs::read(&path)?;
    assert_eq!(&img[256..262],"SECTOR".as_bytes());
    Command::cargo_bin("d64kit")?
        .arg("get").arg("-f").arg("1,1").arg("-t").arg("sec").arg("-d").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SECTOR"));
    Command::cargo_bin("d64kit")?
        .arg("get").arg("-f").arg("36,0").arg("-t").arg("sec").arg("-d").arg(&path)
        .assert()
        .failure();
    Ok(())
}
