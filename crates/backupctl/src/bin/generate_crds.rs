use backupctl::crd::BackupJob;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    println!("---");
    println!("# BackupJob CRD");
    println!("{}", serde_yaml::to_string(&BackupJob::crd())?);
    Ok(())
}
